//! Vehicle entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::VehicleDescriptor;
pub use model::{
    RegisterVehicleRequest, SetVehicleStatusRequest, UpdateVehicleRequest, Vehicle,
    VehicleStatus, VehicleType, normalize_registration,
};
