//! Vendor fleet

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use uuid::Uuid;
use validator::Validate;

static REGISTRATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 \-]{3,19}$").expect("valid registration regex")
});

/// Body style of a truck, shared by vehicles and booking requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    MiniTruck,
    Pickup,
    Lcv,
    Truck,
    Trailer,
    Container,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::MiniTruck => "mini_truck",
            VehicleType::Pickup => "pickup",
            VehicleType::Lcv => "lcv",
            VehicleType::Truck => "truck",
            VehicleType::Trailer => "trailer",
            VehicleType::Container => "container",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

crate::lifecycle!(
    /// Availability of a vehicle
    VehicleStatus, "vehicle" {
        Available => "available": [OnTrip, Maintenance, Inactive],
        OnTrip => "on_trip": [Available, Inactive],
        Maintenance => "maintenance": [Available, Inactive],
        Inactive => "inactive": [Available],
    }
);

crate::impl_entity!(
    /// A truck owned by a vendor
    Vehicle,
    "vehicle",
    "vehicles",
    VehicleStatus,
    {
        vendor_id: Uuid,
        /// Upper-case, whitespace removed; unique
        registration_number: String,
        vehicle_type: VehicleType,
        capacity_tons: f64,
        /// Driver last assigned to the vehicle
        #[serde(default)]
        driver_id: Option<Uuid>,
    }
);

/// `" mh 12-ab 1234 "` → `"MH12-AB1234"`
pub fn normalize_registration(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterVehicleRequest {
    #[validate(regex(path = *REGISTRATION_RE, message = "not a registration number"))]
    pub registration_number: String,
    pub vehicle_type: VehicleType,
    #[validate(range(exclusive_min = 0.0, max = 100.0))]
    pub capacity_tons: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    pub vehicle_type: Option<VehicleType>,
    #[validate(range(exclusive_min = 0.0, max = 100.0))]
    pub capacity_tons: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetVehicleStatusRequest {
    pub status: VehicleStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Lifecycle;

    #[test]
    fn test_normalize_registration() {
        assert_eq!(normalize_registration(" mh 12-ab 1234 "), "MH12-AB1234");
    }

    #[test]
    fn test_status_lifecycle() {
        use VehicleStatus::*;
        assert!(Available.can_transition_to(OnTrip));
        assert!(OnTrip.can_transition_to(Available));
        assert!(Maintenance.can_transition_to(Available));
        assert!(!Maintenance.can_transition_to(OnTrip));
        for status in VehicleStatus::all() {
            if *status != Inactive {
                assert!(status.can_transition_to(Inactive), "{status} -> inactive");
            }
        }
        assert_eq!(Inactive.allowed_next(), &[Available]);
    }

    #[test]
    fn test_vehicle_type_wire_names() {
        assert_eq!(serde_json::to_value(VehicleType::MiniTruck).unwrap(), "mini_truck");
        let parsed: VehicleType = serde_json::from_value("lcv".into()).unwrap();
        assert_eq!(parsed, VehicleType::Lcv);
    }

    #[test]
    fn test_capacity_must_be_positive() {
        let request = RegisterVehicleRequest {
            registration_number: "MH12AB1234".into(),
            vehicle_type: VehicleType::Truck,
            capacity_tons: 0.0,
        };
        assert!(request.validate().is_err());
    }
}
