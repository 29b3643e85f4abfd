//! Vehicles and the drivers who belong to a vendor

use super::WorkflowLock;
use super::auth::{AuthService, NewAccount, normalize_email};
use crate::core::auth::{AuthPolicy, Role};
use crate::core::{CurrentUser, DataService, Entity, LezitError, LezitResult, PaginatedResponse, QueryParams};
use crate::entities::BookingStatus;
use crate::entities::user::{CreateDriverRequest, UserProfile, UserStatus};
use crate::entities::vehicle::{
    RegisterVehicleRequest, SetVehicleStatusRequest, UpdateVehicleRequest, Vehicle,
    VehicleStatus, normalize_registration,
};
use crate::storage::Stores;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct FleetService {
    stores: Stores,
    auth: Arc<AuthService>,
    lock: WorkflowLock,
}

fn vendor_or_admin() -> AuthPolicy {
    AuthPolicy::Or(vec![AuthPolicy::role(Role::Vendor), AuthPolicy::AdminOnly])
}

impl FleetService {
    pub fn new(stores: Stores, auth: Arc<AuthService>, lock: WorkflowLock) -> Self {
        Self { stores, auth, lock }
    }

    pub async fn register_vehicle(
        &self,
        user: &CurrentUser,
        mut request: RegisterVehicleRequest,
    ) -> LezitResult<Vehicle> {
        user.require(&AuthPolicy::role(Role::Vendor))?;
        request.registration_number = normalize_registration(&request.registration_number);
        request.validate()?;
        let registration = request.registration_number;

        let _guard = self.lock.lock().await;
        if self
            .stores
            .vehicles
            .find_one("registration_number", &registration)
            .await?
            .is_some()
        {
            return Err(LezitError::already_exists(
                "vehicle",
                "registration_number",
                registration,
            ));
        }

        let vehicle = Vehicle::new(
            VehicleStatus::Available,
            user.id,
            registration,
            request.vehicle_type,
            request.capacity_tons,
            None,
        );
        let vehicle = self.stores.vehicles.create(vehicle).await?;
        tracing::info!(vehicle_id = %vehicle.id, vendor_id = %user.id, "vehicle registered");
        Ok(vehicle)
    }

    pub async fn list_vehicles(
        &self,
        user: &CurrentUser,
        query: &QueryParams,
    ) -> LezitResult<PaginatedResponse<Vehicle>> {
        user.require(&vendor_or_admin())?;
        query.ensure_status::<VehicleStatus>()?;
        let vehicles = if user.is_admin() {
            self.stores.vehicles.list().await?
        } else {
            self.stores
                .vehicles
                .search("vendor_id", &user.id.to_string())
                .await?
        };
        Ok(query.apply(vehicles)?)
    }

    /// A vehicle the caller owns, or any vehicle for admins
    pub async fn get_vehicle(&self, user: &CurrentUser, id: Uuid) -> LezitResult<Vehicle> {
        user.require(&vendor_or_admin())?;
        let vehicle = self.stores.vehicles.fetch(&id).await?;
        if !user.is_admin() && vehicle.vendor_id != user.id {
            return Err(LezitError::forbidden("vehicle belongs to another vendor"));
        }
        Ok(vehicle)
    }

    pub async fn update_vehicle(
        &self,
        user: &CurrentUser,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> LezitResult<Vehicle> {
        request.validate()?;
        let _guard = self.lock.lock().await;
        let mut vehicle = self.get_vehicle(user, id).await?;
        if let Some(vehicle_type) = request.vehicle_type {
            vehicle.vehicle_type = vehicle_type;
        }
        if let Some(capacity) = request.capacity_tons {
            vehicle.capacity_tons = capacity;
        }
        vehicle.touch();
        Ok(self.stores.vehicles.save(vehicle).await?)
    }

    /// Manual status change; trips drive `on_trip` on their own
    pub async fn set_vehicle_status(
        &self,
        user: &CurrentUser,
        id: Uuid,
        request: SetVehicleStatusRequest,
    ) -> LezitResult<Vehicle> {
        let _guard = self.lock.lock().await;
        let mut vehicle = self.get_vehicle(user, id).await?;
        if request.status == VehicleStatus::OnTrip || vehicle.status == VehicleStatus::OnTrip {
            return Err(LezitError::conflict(
                "on_trip is controlled by the booking workflow",
            ));
        }
        if request.status != VehicleStatus::Available {
            self.ensure_not_booked(&vehicle).await?;
        }
        vehicle.transition_to(request.status)?;
        let vehicle = self.stores.vehicles.save(vehicle).await?;
        tracing::info!(vehicle_id = %vehicle.id, status = %vehicle.status, "vehicle status changed");
        Ok(vehicle)
    }

    pub async fn delete_vehicle(&self, user: &CurrentUser, id: Uuid) -> LezitResult<()> {
        let _guard = self.lock.lock().await;
        let vehicle = self.get_vehicle(user, id).await?;
        if vehicle.status == VehicleStatus::OnTrip {
            return Err(LezitError::conflict("vehicle is on a trip"));
        }
        self.ensure_not_booked(&vehicle).await?;
        self.stores.vehicles.delete(&vehicle.id).await?;
        tracing::info!(vehicle_id = %id, "vehicle removed");
        Ok(())
    }

    /// Refuse while an assigned or running booking holds the vehicle
    async fn ensure_not_booked(&self, vehicle: &Vehicle) -> LezitResult<()> {
        let booked = self
            .stores
            .bookings
            .search("vehicle_id", &vehicle.id.to_string())
            .await?
            .iter()
            .any(|b| matches!(b.status, BookingStatus::Assigned | BookingStatus::InTransit));
        if booked {
            return Err(LezitError::conflict("vehicle is assigned to an active booking"));
        }
        Ok(())
    }

    /// Create a driver account owned by the calling vendor
    pub async fn create_driver(
        &self,
        user: &CurrentUser,
        mut request: CreateDriverRequest,
    ) -> LezitResult<UserProfile> {
        user.require(&AuthPolicy::role(Role::Vendor))?;
        request.email = normalize_email(&request.email);
        request.validate()?;
        let driver = self
            .auth
            .create_account(NewAccount {
                name: request.name,
                email: request.email,
                password: request.password,
                phone: request.phone,
                role: Role::Driver,
                company_name: None,
                license_number: Some(request.license_number),
                vendor_id: Some(user.id),
            })
            .await?;
        Ok(driver.into())
    }

    pub async fn list_drivers(
        &self,
        user: &CurrentUser,
        query: &QueryParams,
    ) -> LezitResult<PaginatedResponse<UserProfile>> {
        user.require(&AuthPolicy::role(Role::Vendor))?;
        let drivers = self
            .stores
            .users
            .search("vendor_id", &user.id.to_string())
            .await?
            .into_iter()
            .filter(|u| u.role == Role::Driver)
            .collect();
        Ok(query.apply(drivers)?.map(UserProfile::from))
    }

    /// Take on a self-registered driver
    pub async fn attach_driver(
        &self,
        user: &CurrentUser,
        driver_id: Uuid,
    ) -> LezitResult<UserProfile> {
        user.require(&AuthPolicy::role(Role::Vendor))?;

        let _guard = self.lock.lock().await;
        let mut driver = self.stores.users.fetch(&driver_id).await?;
        if driver.role != Role::Driver {
            return Err(LezitError::invalid_field("driver_id", "not a driver account"));
        }
        if driver.status != UserStatus::Active {
            return Err(LezitError::conflict("driver account is suspended"));
        }
        if driver.vendor_id.is_some() {
            return Err(LezitError::conflict("driver already works for a vendor"));
        }

        driver.vendor_id = Some(user.id);
        driver.touch();
        let driver = self.stores.users.save(driver).await?;
        tracing::info!(driver_id = %driver.id, vendor_id = %user.id, "driver attached");
        Ok(driver.into())
    }
}
