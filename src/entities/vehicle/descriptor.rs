//! Entity descriptor for Vehicle

use super::handlers::{
    attach_driver, create_driver, create_vehicle, delete_vehicle, get_vehicle, list_drivers,
    list_vehicles, set_vehicle_status, update_vehicle,
};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::ServerHost;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

/// Vehicles plus the vendor's driver roster
pub struct VehicleDescriptor;

impl EntityDescriptor for VehicleDescriptor {
    fn entity_type(&self) -> &str {
        "vehicle"
    }

    fn plural(&self) -> &str {
        "vehicles"
    }

    fn build_routes(&self) -> Router<Arc<ServerHost>> {
        Router::new()
            .route("/vehicles", get(list_vehicles).post(create_vehicle))
            .route(
                "/vehicles/{id}",
                get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
            )
            .route("/vehicles/{id}/status", post(set_vehicle_status))
            .route("/vendor/drivers", get(list_drivers).post(create_driver))
            .route("/vendor/drivers/{id}/attach", post(attach_driver))
    }
}
