//! Business logic behind the HTTP handlers
//!
//! Every service receives the [`CurrentUser`] and checks its own access rules,
//! so handlers stay thin. Multi-record writes hold the shared
//! [`WorkflowLock`] for their whole read-check-write sequence.

pub mod auth;
pub mod bookings;
pub mod dashboards;
pub mod fleet;
pub mod orders;

pub use auth::AuthService;
pub use bookings::{BookingService, BookingTimeline};
pub use dashboards::DashboardService;
pub use fleet::FleetService;
pub use orders::OrderService;

use crate::core::auth::Role;
use crate::core::{CurrentUser, Entity, LezitError, LezitResult};
use crate::entities::Booking;
use std::sync::Arc;

/// Serializes multi-record writes
pub type WorkflowLock = Arc<tokio::sync::Mutex<()>>;

/// Tolerance when comparing sums of money
pub(crate) const AMOUNT_EPSILON: f64 = 0.005;

/// Whether the caller is a party to the booking
pub(crate) fn can_view_booking(user: &CurrentUser, booking: &Booking) -> bool {
    match user.role {
        Role::Admin => true,
        Role::Customer => booking.customer_id == user.id,
        Role::Vendor => booking.vendor_id == Some(user.id),
        Role::Driver => booking.driver_id == Some(user.id),
    }
}

pub(crate) fn ensure_booking_visible(user: &CurrentUser, booking: &Booking) -> LezitResult<()> {
    if can_view_booking(user, booking) {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.id, booking_id = %booking.id, "booking outside caller scope");
        Err(LezitError::forbidden("booking is not accessible to this account"))
    }
}

/// Oldest first
pub(crate) fn chronological<T: Entity>(mut items: Vec<T>) -> Vec<T> {
    items.sort_by_key(|e| e.created_at());
    items
}
