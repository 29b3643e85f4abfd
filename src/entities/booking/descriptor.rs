//! Entity descriptor for Booking

use super::handlers::{
    assign_driver, booking_timeline, cancel_booking, complete_booking, create_booking,
    get_booking, list_bookings, update_booking, update_trip_status,
};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::ServerHost;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

pub struct BookingDescriptor;

impl EntityDescriptor for BookingDescriptor {
    fn entity_type(&self) -> &str {
        "booking"
    }

    fn plural(&self) -> &str {
        "bookings"
    }

    fn build_routes(&self) -> Router<Arc<ServerHost>> {
        Router::new()
            .route("/bookings", get(list_bookings).post(create_booking))
            .route("/bookings/{id}", get(get_booking).put(update_booking))
            .route("/bookings/{id}/cancel", post(cancel_booking))
            .route("/bookings/{id}/assign-driver", post(assign_driver))
            .route("/bookings/{id}/status", post(update_trip_status))
            .route("/bookings/{id}/complete", post(complete_booking))
            .route("/bookings/{id}/timeline", get(booking_timeline))
    }
}
