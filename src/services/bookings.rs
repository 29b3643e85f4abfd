//! Booking lifecycle: request, edit, cancel, assign and track trips

use super::{WorkflowLock, chronological, ensure_booking_visible};
use crate::core::auth::{AuthPolicy, Role};
use crate::core::reference;
use crate::core::workflow::ensure_transition;
use crate::core::{
    CurrentUser, DataService, Entity, LezitError, LezitResult, PaginatedResponse,
    QueryParams,
};
use crate::entities::booking::{
    AssignDriverRequest, Booking, BookingStatus, CreateBookingRequest, TripStatusRequest,
    UpdateBookingRequest,
};
use crate::entities::{
    Document, FinancialTransaction, PurchaseOrder, PurchaseOrderStatus, Quotation,
    QuotationStatus, SalesOrder, SalesOrderStatus, UserStatus, VehicleStatus,
};
use crate::storage::Stores;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

/// A booking with every record that hangs off it, oldest first
#[derive(Debug, Serialize)]
pub struct BookingTimeline {
    pub booking: Booking,
    pub quotations: Vec<Quotation>,
    pub sales_orders: Vec<SalesOrder>,
    pub purchase_orders: Vec<PurchaseOrder>,
    pub transactions: Vec<FinancialTransaction>,
    pub documents: Vec<Document>,
}

pub struct BookingService {
    stores: Stores,
    lock: WorkflowLock,
}

fn ensure_future(field: &str, at: DateTime<Utc>) -> LezitResult<()> {
    if at < Utc::now() {
        return Err(LezitError::invalid_field(field, "must not be in the past"));
    }
    Ok(())
}

fn ensure_distinct_locations(pickup: &str, drop: &str) -> LezitResult<()> {
    if pickup.trim().eq_ignore_ascii_case(drop.trim()) {
        return Err(LezitError::invalid_field(
            "drop_location",
            "must differ from pickup_location",
        ));
    }
    Ok(())
}

impl BookingService {
    pub fn new(stores: Stores, lock: WorkflowLock) -> Self {
        Self { stores, lock }
    }

    pub async fn create(
        &self,
        user: &CurrentUser,
        request: CreateBookingRequest,
    ) -> LezitResult<Booking> {
        user.require(&AuthPolicy::role(Role::Customer))?;
        request.validate()?;
        ensure_future("pickup_date", request.pickup_date)?;
        ensure_distinct_locations(&request.pickup_location, &request.drop_location)?;

        let mut booking = Booking::new(
            BookingStatus::Pending,
            String::new(),
            user.id,
            request.pickup_location.trim().to_string(),
            request.drop_location.trim().to_string(),
            request.pickup_date,
            request.goods_type.trim().to_string(),
            request.weight_tons,
            request.vehicle_type,
            request.notes,
            None,
            None,
            None,
        );
        booking.reference = reference::generate(reference::BOOKING, &booking.id, booking.created_at);

        let booking = self.stores.bookings.create(booking).await?;
        tracing::info!(booking_id = %booking.id, reference = %booking.reference, "booking created");
        Ok(booking)
    }

    /// Bookings within the caller's scope
    pub async fn list(
        &self,
        user: &CurrentUser,
        query: &QueryParams,
    ) -> LezitResult<PaginatedResponse<Booking>> {
        query.ensure_status::<BookingStatus>()?;
        let id = user.id.to_string();
        let bookings = match user.role {
            Role::Admin => self.stores.bookings.list().await?,
            Role::Customer => self.stores.bookings.search("customer_id", &id).await?,
            Role::Vendor => self.stores.bookings.search("vendor_id", &id).await?,
            Role::Driver => self.stores.bookings.search("driver_id", &id).await?,
        };
        Ok(query.apply(bookings)?)
    }

    pub async fn get(&self, user: &CurrentUser, id: Uuid) -> LezitResult<Booking> {
        let booking = self.stores.bookings.fetch(&id).await?;
        ensure_booking_visible(user, &booking)?;
        Ok(booking)
    }

    /// The owning customer may edit details while nothing has been quoted
    pub async fn update(
        &self,
        user: &CurrentUser,
        id: Uuid,
        request: UpdateBookingRequest,
    ) -> LezitResult<Booking> {
        user.require(&AuthPolicy::role(Role::Customer))?;
        request.validate()?;

        let _guard = self.lock.lock().await;
        let mut booking = self.get(user, id).await?;
        if booking.status != BookingStatus::Pending {
            return Err(LezitError::conflict(format!(
                "booking can only be edited while pending (currently {})",
                booking.status
            )));
        }

        if let Some(pickup_date) = request.pickup_date {
            ensure_future("pickup_date", pickup_date)?;
            booking.pickup_date = pickup_date;
        }
        if let Some(pickup) = request.pickup_location {
            booking.pickup_location = pickup.trim().to_string();
        }
        if let Some(drop) = request.drop_location {
            booking.drop_location = drop.trim().to_string();
        }
        ensure_distinct_locations(&booking.pickup_location, &booking.drop_location)?;
        if let Some(goods_type) = request.goods_type {
            booking.goods_type = goods_type.trim().to_string();
        }
        if let Some(weight) = request.weight_tons {
            booking.weight_tons = weight;
        }
        if let Some(vehicle_type) = request.vehicle_type {
            booking.vehicle_type = vehicle_type;
        }
        if request.notes.is_some() {
            booking.notes = request.notes;
        }
        booking.touch();

        Ok(self.stores.bookings.save(booking).await?)
    }

    /// Cancel a booking and everything still open under it
    ///
    /// Customers may cancel their own booking until it is confirmed; admins
    /// wherever the lifecycle allows.
    pub async fn cancel(&self, user: &CurrentUser, id: Uuid) -> LezitResult<Booking> {
        user.require(&AuthPolicy::Or(vec![
            AuthPolicy::role(Role::Customer),
            AuthPolicy::AdminOnly,
        ]))?;

        let _guard = self.lock.lock().await;
        let mut booking = self.get(user, id).await?;
        // terminal bookings report the lifecycle error before the role rule
        ensure_transition(booking.status, BookingStatus::Cancelled)?;
        if !user.is_admin()
            && !matches!(booking.status, BookingStatus::Pending | BookingStatus::Quoted)
        {
            return Err(LezitError::conflict(
                "bookings can only be cancelled by the customer before confirmation",
            ));
        }
        booking.transition_to(BookingStatus::Cancelled)?;

        let booking_id = booking.id.to_string();
        for mut order in self.stores.sales_orders.search("booking_id", &booking_id).await? {
            if order.status == SalesOrderStatus::Open {
                order.transition_to(SalesOrderStatus::Cancelled)?;
                self.stores.sales_orders.save(order).await?;
            }
        }
        for mut order in self.stores.purchase_orders.search("booking_id", &booking_id).await? {
            if order.status.is_live() {
                order.transition_to(PurchaseOrderStatus::Cancelled)?;
                self.stores.purchase_orders.save(order).await?;
            }
        }
        for mut quotation in self.stores.quotations.search("booking_id", &booking_id).await? {
            if matches!(quotation.status, QuotationStatus::Draft | QuotationStatus::Sent) {
                quotation.transition_to(QuotationStatus::Expired)?;
                self.stores.quotations.save(quotation).await?;
            }
        }
        if let Some(vehicle_id) = booking.vehicle_id {
            self.release_vehicle(vehicle_id).await?;
        }

        let booking = self.stores.bookings.save(booking).await?;
        tracing::info!(booking_id = %booking.id, by = %user.id, "booking cancelled");
        Ok(booking)
    }

    /// Put a driver and vehicle of the booking's vendor on the job
    ///
    /// Calling it again on an assigned booking swaps the crew.
    pub async fn assign_driver(
        &self,
        user: &CurrentUser,
        id: Uuid,
        request: AssignDriverRequest,
    ) -> LezitResult<Booking> {
        user.require(&AuthPolicy::Or(vec![
            AuthPolicy::role(Role::Vendor),
            AuthPolicy::AdminOnly,
        ]))?;

        let _guard = self.lock.lock().await;
        let mut booking = self.get(user, id).await?;
        let vendor_id = booking
            .vendor_id
            .ok_or_else(|| LezitError::conflict("booking has no vendor yet"))?;

        let has_accepted_order = self
            .stores
            .purchase_orders
            .search("booking_id", &booking.id.to_string())
            .await?
            .iter()
            .any(|po| po.vendor_id == vendor_id && po.status == PurchaseOrderStatus::Accepted);
        if !has_accepted_order {
            return Err(LezitError::conflict(
                "the vendor must accept the purchase order before assigning a driver",
            ));
        }

        let driver = self.stores.users.fetch(&request.driver_id).await?;
        if driver.role != Role::Driver || driver.vendor_id != Some(vendor_id) {
            return Err(LezitError::invalid_field(
                "driver_id",
                "not a driver of this vendor",
            ));
        }
        if driver.status != UserStatus::Active {
            return Err(LezitError::conflict("driver account is suspended"));
        }

        let mut vehicle = self.stores.vehicles.fetch(&request.vehicle_id).await?;
        if vehicle.vendor_id != vendor_id {
            return Err(LezitError::invalid_field(
                "vehicle_id",
                "not a vehicle of this vendor",
            ));
        }
        if vehicle.status != VehicleStatus::Available {
            return Err(LezitError::conflict(format!(
                "vehicle is {}, not available",
                vehicle.status
            )));
        }

        let busy = |other: &Booking| {
            other.id != booking.id
                && matches!(other.status, BookingStatus::Assigned | BookingStatus::InTransit)
        };
        if self
            .stores
            .bookings
            .search("driver_id", &driver.id.to_string())
            .await?
            .iter()
            .any(busy)
        {
            return Err(LezitError::conflict("driver is already on another booking"));
        }
        if self
            .stores
            .bookings
            .search("vehicle_id", &vehicle.id.to_string())
            .await?
            .iter()
            .any(busy)
        {
            return Err(LezitError::conflict("vehicle is already on another booking"));
        }

        if booking.status != BookingStatus::Assigned {
            booking.transition_to(BookingStatus::Assigned)?;
        }
        if let Some(previous) = booking.vehicle_id.filter(|v| *v != vehicle.id) {
            self.release_vehicle(previous).await?;
        }
        booking.driver_id = Some(driver.id);
        booking.vehicle_id = Some(vehicle.id);
        booking.touch();

        vehicle.driver_id = Some(driver.id);
        vehicle.touch();
        self.stores.vehicles.save(vehicle).await?;

        let booking = self.stores.bookings.save(booking).await?;
        tracing::info!(booking_id = %booking.id, driver_id = %driver.id, "driver assigned");
        Ok(booking)
    }

    /// Trip progress: in_transit, then delivered
    pub async fn update_trip_status(
        &self,
        user: &CurrentUser,
        id: Uuid,
        request: TripStatusRequest,
    ) -> LezitResult<Booking> {
        user.require(&AuthPolicy::Or(vec![
            AuthPolicy::HasRole(vec![Role::Driver, Role::Vendor]),
            AuthPolicy::AdminOnly,
        ]))?;
        if !matches!(
            request.status,
            BookingStatus::InTransit | BookingStatus::Delivered
        ) {
            return Err(LezitError::invalid_field(
                "status",
                "must be in_transit or delivered",
            ));
        }

        let _guard = self.lock.lock().await;
        let mut booking = self.get(user, id).await?;
        booking.transition_to(request.status)?;

        if let Some(vehicle_id) = booking.vehicle_id {
            match request.status {
                BookingStatus::InTransit => {
                    let mut vehicle = self.stores.vehicles.fetch(&vehicle_id).await?;
                    vehicle.transition_to(VehicleStatus::OnTrip)?;
                    self.stores.vehicles.save(vehicle).await?;
                }
                _ => self.release_vehicle(vehicle_id).await?,
            }
        }

        let booking = self.stores.bookings.save(booking).await?;
        tracing::info!(booking_id = %booking.id, status = %booking.status, "trip status updated");
        Ok(booking)
    }

    pub async fn complete(&self, user: &CurrentUser, id: Uuid) -> LezitResult<Booking> {
        user.require(&AuthPolicy::AdminOnly)?;

        let _guard = self.lock.lock().await;
        let mut booking = self.stores.bookings.fetch(&id).await?;
        booking.transition_to(BookingStatus::Completed)?;
        let booking = self.stores.bookings.save(booking).await?;
        tracing::info!(booking_id = %booking.id, "booking completed");
        Ok(booking)
    }

    pub async fn timeline(&self, user: &CurrentUser, id: Uuid) -> LezitResult<BookingTimeline> {
        let booking = self.get(user, id).await?;
        let key = booking.id.to_string();

        Ok(BookingTimeline {
            quotations: chronological(self.stores.quotations.search("booking_id", &key).await?),
            sales_orders: chronological(self.stores.sales_orders.search("booking_id", &key).await?),
            purchase_orders: chronological(
                self.stores.purchase_orders.search("booking_id", &key).await?,
            ),
            transactions: chronological(self.stores.transactions.search("booking_id", &key).await?),
            documents: chronological(self.stores.documents.search("booking_id", &key).await?),
            booking,
        })
    }

    /// Vehicle back to available, without a driver, after a trip, a
    /// cancellation or a crew swap
    async fn release_vehicle(&self, vehicle_id: Uuid) -> LezitResult<()> {
        let Some(mut vehicle) = self.stores.vehicles.get(&vehicle_id).await? else {
            return Ok(());
        };
        if vehicle.status == VehicleStatus::OnTrip {
            vehicle.transition_to(VehicleStatus::Available)?;
        }
        vehicle.driver_id = None;
        vehicle.touch();
        self.stores.vehicles.save(vehicle).await?;
        Ok(())
    }
}
