//! Authentication and authorization primitives
//!
//! Provides:
//! - [`Role`]: the four kinds of account
//! - [`AuthContext`] / [`AuthPolicy`]: who is calling and what they may do
//! - [`TokenService`]: HS256 bearer tokens
//! - [`PasswordHasher`]: peppered argon2id password hashes

use crate::core::error::{LezitError, LezitResult};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Argon2, Params, Version};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;


/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Vendor,
    Driver,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Customer, Role::Vendor, Role::Driver, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Vendor => "vendor",
            Role::Driver => "driver",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authorization context extracted from a request
#[derive(Debug, Clone, PartialEq)]
pub enum AuthContext {
    /// Caller presented a valid token for an active account
    User {
        user_id: Uuid,
        role: Role,
        email: String,
    },

    /// No credentials (public access)
    Anonymous,
}

impl AuthContext {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            AuthContext::User { user_id, .. } => Some(*user_id),
            AuthContext::Anonymous => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            AuthContext::User { role, .. } => Some(*role),
            AuthContext::Anonymous => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }
}

/// Authorization policy for an operation
#[derive(Debug, Clone)]
pub enum AuthPolicy {
    /// Public access (no auth required)
    Public,

    /// Any authenticated user
    Authenticated,

    /// User must have one of these roles
    HasRole(Vec<Role>),

    /// Admin only
    AdminOnly,

    /// Combination of policies (OR)
    Or(Vec<AuthPolicy>),
}

impl AuthPolicy {
    /// Check if auth context satisfies this policy
    pub fn check(&self, context: &AuthContext) -> bool {
        match self {
            AuthPolicy::Public => true,

            AuthPolicy::Authenticated => !matches!(context, AuthContext::Anonymous),

            AuthPolicy::HasRole(roles) => context.role().is_some_and(|r| roles.contains(&r)),

            AuthPolicy::AdminOnly => context.is_admin(),

            AuthPolicy::Or(policies) => policies.iter().any(|p| p.check(context)),
        }
    }

    /// Single-role shorthand
    pub fn role(role: Role) -> Self {
        AuthPolicy::HasRole(vec![role])
    }

    /// Fail with 403 unless the context satisfies the policy
    pub fn enforce(&self, context: &AuthContext) -> LezitResult<()> {
        if self.check(context) {
            return Ok(());
        }
        tracing::warn!(user_id = ?context.user_id(), role = ?context.role(), policy = ?self, "access denied");
        Err(LezitError::forbidden(match self {
            AuthPolicy::HasRole(roles) => format!(
                "requires role {}",
                roles.iter().map(Role::as_str).collect::<Vec<_>>().join(" or ")
            ),
            AuthPolicy::AdminOnly => "requires role admin".to_string(),
            _ => "not allowed".to_string(),
        }))
    }
}

// =============================================================================
// Tokens
// =============================================================================

/// Claims carried by a bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 bearer tokens
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

/// One year
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

impl TokenService {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl: Duration::hours(ttl_hours.clamp(1, MAX_TOKEN_TTL_HOURS)),
        }
    }

    /// Sign a token for the given account
    pub fn issue(&self, user_id: Uuid, role: Role, email: &str) -> LezitResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            role,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &Claims) -> LezitResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| LezitError::Internal(format!("failed to sign token: {}", e)))
    }

    /// Decode a token, checking signature and expiry
    pub fn verify(&self, token: &str) -> LezitResult<Claims> {
        Ok(decode::<Claims>(token, &self.decoding, &self.validation)?.claims)
    }
}

// =============================================================================
// Passwords
// =============================================================================

/// Argon2id password hashes in PHC string form, keyed with a server-side pepper
pub struct PasswordHasher {
    pepper: Vec<u8>,
}

impl PasswordHasher {
    pub fn new(pepper: impl AsRef<[u8]>) -> Self {
        Self {
            pepper: pepper.as_ref().to_vec(),
        }
    }

    pub fn hash(&self, password: &str) -> LezitResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| LezitError::Internal(format!("password hashing failed: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Anything that is not a parseable PHC string never verifies
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            return false;
        };
        self.argon2()
            .map(|argon2| argon2.verify_password(password.as_bytes(), &parsed).is_ok())
            .unwrap_or(false)
    }

    fn argon2(&self) -> LezitResult<Argon2<'_>> {
        Argon2::new_with_secret(
            &self.pepper,
            argon2::Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| LezitError::Internal(format!("invalid password pepper: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-at-least-32-bytes!";

    fn user(role: Role) -> AuthContext {
        AuthContext::User {
            user_id: Uuid::new_v4(),
            role,
            email: "someone@lezit.test".into(),
        }
    }

    #[test]
    fn test_policy_check() {
        let customer = user(Role::Customer);
        let admin = user(Role::Admin);

        assert!(AuthPolicy::Public.check(&AuthContext::Anonymous));
        assert!(!AuthPolicy::Authenticated.check(&AuthContext::Anonymous));
        assert!(AuthPolicy::Authenticated.check(&customer));
        assert!(AuthPolicy::role(Role::Customer).check(&customer));
        assert!(!AuthPolicy::role(Role::Vendor).check(&customer));
        assert!(AuthPolicy::AdminOnly.check(&admin));
        assert!(!AuthPolicy::AdminOnly.check(&customer));

        let vendor_or_admin =
            AuthPolicy::Or(vec![AuthPolicy::role(Role::Vendor), AuthPolicy::AdminOnly]);
        assert!(vendor_or_admin.check(&admin));
        assert!(!vendor_or_admin.check(&customer));
    }

    #[test]
    fn test_enforce_is_forbidden() {
        let err = AuthPolicy::role(Role::Vendor)
            .enforce(&user(Role::Driver))
            .unwrap_err();
        assert_eq!(err.error_code(), "FORBIDDEN");
        assert!(err.to_string().contains("vendor"));
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_value(Role::Driver).unwrap(), "driver");
        assert_eq!(Role::parse("vendor"), Some(Role::Vendor));
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn test_token_round_trip() {
        let tokens = TokenService::new(SECRET, 1);
        let id = Uuid::new_v4();
        let token = tokens.issue(id, Role::Vendor, "fleet@lezit.test").unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::Vendor);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        let tokens = TokenService::new(SECRET, 1);
        let now = Utc::now().timestamp();
        let token = tokens
            .sign(&Claims {
                sub: Uuid::new_v4(),
                role: Role::Customer,
                email: "late@lezit.test".into(),
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap();

        let err = tokens.verify(&token).unwrap_err();
        assert_eq!(err.error_code(), "UNAUTHORIZED");
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let issuer = TokenService::new(SECRET, 1);
        let other = TokenService::new("another-secret-also-32-bytes-long!!", 1);
        let token = issuer.issue(Uuid::new_v4(), Role::Admin, "a@lezit.test").unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_oversized_ttl_is_capped() {
        let service = TokenService::new(SECRET, i64::MAX);
        let token = service.issue(Uuid::new_v4(), Role::Customer, "a@lezit.test").unwrap();
        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, MAX_TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hasher = PasswordHasher::new("pepper");
        let stored = hasher.hash("correct horse").unwrap();

        assert!(hasher.verify("correct horse", &stored));
        assert!(!hasher.verify("wrong horse", &stored));
        assert!(!PasswordHasher::new("other").verify("correct horse", &stored));
    }

    #[test]
    fn test_password_hash_is_salted() {
        let hasher = PasswordHasher::new("pepper");
        let a = hasher.hash("same password").unwrap();
        let b = hasher.hash("same password").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
        assert!(!hasher.verify("same password", "garbage"));
        assert!(!hasher.verify("same password", "salt$digest"));
    }
}
