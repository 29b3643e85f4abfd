//! User accounts

use crate::core::auth::Role;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;
use validator::Validate;

pub(crate) static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 \-]{6,18}$").expect("valid phone regex"));

crate::lifecycle!(
    /// Account status
    UserStatus, "user" {
        Active => "active": [Suspended],
        Suspended => "suspended": [Active],
    }
);

crate::impl_entity!(
    /// A customer, vendor, driver or administrator account
    User,
    "user",
    "users",
    UserStatus,
    {
        name: String,
        /// Trimmed and lower-cased; unique
        email: String,
        #[serde(default)]
        phone: Option<String>,
        role: Role,
        password_hash: String,
        /// Vendors only
        #[serde(default)]
        company_name: Option<String>,
        /// Drivers only
        #[serde(default)]
        license_number: Option<String>,
        /// Vendor a driver works for
        #[serde(default)]
        vendor_id: Option<Uuid>,
    }
);

/// Public projection of a [`User`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    pub company_name: Option<String>,
    pub license_number: Option<String>,
    pub vendor_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
            status: user.status,
            company_name: user.company_name.clone(),
            license_number: user.license_number.clone(),
            vendor_id: user.vendor_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile::from(&user)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "must be at least 8 characters"))]
    pub password: String,
    #[validate(regex(path = *PHONE_RE, message = "not a phone number"))]
    pub phone: Option<String>,
    pub role: Role,
    #[validate(length(min = 1, max = 200))]
    pub company_name: Option<String>,
    #[validate(length(min = 4, max = 40))]
    pub license_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(regex(path = *PHONE_RE, message = "not a phone number"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub company_name: Option<String>,
    #[validate(length(min = 4, max = 40))]
    pub license_number: Option<String>,
}

/// A driver account created by a vendor
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDriverRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "must be at least 8 characters"))]
    pub password: String,
    #[validate(regex(path = *PHONE_RE, message = "not a phone number"))]
    pub phone: Option<String>,
    #[validate(length(min = 4, max = 40))]
    pub license_number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetUserStatusRequest {
    pub status: UserStatus,
}

/// Token plus profile returned by register and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}
