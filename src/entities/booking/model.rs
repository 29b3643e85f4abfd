//! Transport bookings

use crate::entities::vehicle::VehicleType;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

crate::lifecycle!(
    /// Progress of a booking from request to completion
    BookingStatus, "booking" {
        Pending => "pending": [Quoted, Cancelled],
        Quoted => "quoted": [Confirmed, Pending, Cancelled],
        Confirmed => "confirmed": [Assigned, Cancelled],
        Assigned => "assigned": [InTransit, Confirmed, Cancelled],
        InTransit => "in_transit": [Delivered],
        Delivered => "delivered": [Completed],
        Completed => "completed": [],
        Cancelled => "cancelled": [],
    }
);

crate::impl_entity!(
    /// A customer's request to move goods
    Booking,
    "booking",
    "bookings",
    BookingStatus,
    {
        /// BK-YYYYMMDD-XXXXXX
        reference: String,
        customer_id: Uuid,
        pickup_location: String,
        drop_location: String,
        pickup_date: DateTime<Utc>,
        goods_type: String,
        weight_tons: f64,
        vehicle_type: VehicleType,
        #[serde(default)]
        notes: Option<String>,
        /// Set when a purchase order is issued
        #[serde(default)]
        vendor_id: Option<Uuid>,
        #[serde(default)]
        driver_id: Option<Uuid>,
        #[serde(default)]
        vehicle_id: Option<Uuid>,
    }
);

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[validate(length(min = 2, max = 200))]
    pub pickup_location: String,
    #[validate(length(min = 2, max = 200))]
    pub drop_location: String,
    pub pickup_date: DateTime<Utc>,
    #[validate(length(min = 1, max = 100))]
    pub goods_type: String,
    #[validate(range(exclusive_min = 0.0, max = 100.0))]
    pub weight_tons: f64,
    pub vehicle_type: VehicleType,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBookingRequest {
    #[validate(length(min = 2, max = 200))]
    pub pickup_location: Option<String>,
    #[validate(length(min = 2, max = 200))]
    pub drop_location: Option<String>,
    pub pickup_date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, max = 100))]
    pub goods_type: Option<String>,
    #[validate(range(exclusive_min = 0.0, max = 100.0))]
    pub weight_tons: Option<f64>,
    pub vehicle_type: Option<VehicleType>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignDriverRequest {
    pub driver_id: Uuid,
    pub vehicle_id: Uuid,
}

/// Trip progress reported by the driver or vendor
#[derive(Debug, Clone, Deserialize)]
pub struct TripStatusRequest {
    pub status: BookingStatus,
}
