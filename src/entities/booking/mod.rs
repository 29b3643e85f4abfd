//! Booking entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::BookingDescriptor;
pub use model::{
    AssignDriverRequest, Booking, BookingStatus, CreateBookingRequest, TripStatusRequest,
    UpdateBookingRequest,
};
