//! User entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::UserDescriptor;
pub use model::{
    AuthResponse, CreateDriverRequest, LoginRequest, RegisterRequest, SetUserStatusRequest,
    UpdateProfileRequest, User, UserProfile, UserStatus,
};
