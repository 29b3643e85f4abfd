//! Registration, login and account administration

use super::WorkflowLock;
use crate::config::BootstrapAdmin;
use crate::core::auth::{AuthContext, AuthPolicy, PasswordHasher, Role, TokenService};
use crate::core::{CurrentUser, DataService, Entity, LezitError, LezitResult, PaginatedResponse, QueryParams};
use crate::entities::user::{
    AuthResponse, LoginRequest, RegisterRequest, SetUserStatusRequest, UpdateProfileRequest,
    User, UserProfile, UserStatus,
};
use crate::storage::Stores;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Verified against when the email is unknown so both failure paths cost one
/// argon2id run with the default parameters
const DECOY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHRzYWx0c2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Everything needed to create an account
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: Role,
    pub company_name: Option<String>,
    pub license_number: Option<String>,
    pub vendor_id: Option<Uuid>,
}

pub struct AuthService {
    stores: Stores,
    tokens: Arc<TokenService>,
    passwords: Arc<PasswordHasher>,
    lock: WorkflowLock,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AuthService {
    pub fn new(
        stores: Stores,
        tokens: Arc<TokenService>,
        passwords: Arc<PasswordHasher>,
        lock: WorkflowLock,
    ) -> Self {
        Self {
            stores,
            tokens,
            passwords,
            lock,
        }
    }

    /// Self-service sign-up
    ///
    /// Only an authenticated admin may create another admin this way.
    pub async fn register(
        &self,
        caller: &AuthContext,
        mut request: RegisterRequest,
    ) -> LezitResult<AuthResponse> {
        request.email = normalize_email(&request.email);
        request.validate()?;

        if request.role == Role::Admin && !caller.is_admin() {
            tracing::warn!(email = %request.email, "admin self-registration refused");
            return Err(LezitError::forbidden(
                "administrator accounts cannot be self-registered",
            ));
        }

        let user = self
            .create_account(NewAccount {
                name: request.name,
                email: request.email,
                password: request.password,
                phone: request.phone,
                role: request.role,
                company_name: request.company_name,
                license_number: request.license_number,
                vendor_id: None,
            })
            .await?;

        self.respond_with_token(&user)
    }

    /// Create a user after role-specific checks; email must be unused
    pub async fn create_account(&self, account: NewAccount) -> LezitResult<User> {
        let company_name = non_blank(account.company_name);
        let license_number = non_blank(account.license_number);

        match account.role {
            Role::Vendor if company_name.is_none() => {
                return Err(LezitError::invalid_field(
                    "company_name",
                    "required for vendor accounts",
                ));
            }
            Role::Driver if license_number.is_none() => {
                return Err(LezitError::invalid_field(
                    "license_number",
                    "required for driver accounts",
                ));
            }
            _ => {}
        }

        let email = normalize_email(&account.email);
        let password_hash = self.passwords.hash(&account.password)?;

        let _guard = self.lock.lock().await;
        if self.stores.users.find_one("email", &email).await?.is_some() {
            return Err(LezitError::already_exists("user", "email", email));
        }

        let user = User::new(
            UserStatus::Active,
            account.name.trim().to_string(),
            email,
            non_blank(account.phone),
            account.role,
            password_hash,
            company_name.filter(|_| account.role == Role::Vendor),
            license_number.filter(|_| account.role == Role::Driver),
            account.vendor_id,
        );
        let user = self.stores.users.create(user).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "account created");
        Ok(user)
    }

    pub async fn login(&self, request: LoginRequest) -> LezitResult<AuthResponse> {
        request.validate()?;
        let email = normalize_email(&request.email);

        let user = self.stores.users.find_one("email", &email).await?;
        let stored = user
            .as_ref()
            .map(|u| u.password_hash.as_str())
            .unwrap_or(DECOY_HASH);
        let password_ok = self.passwords.verify(&request.password, stored);

        let user = match user {
            Some(user) if password_ok => user,
            _ => {
                tracing::warn!(email = %email, "failed login");
                return Err(LezitError::unauthorized(INVALID_CREDENTIALS));
            }
        };

        if user.status == UserStatus::Suspended {
            return Err(LezitError::forbidden("account suspended"));
        }

        tracing::info!(user_id = %user.id, "login");
        self.respond_with_token(&user)
    }

    pub async fn profile(&self, user: &CurrentUser) -> LezitResult<UserProfile> {
        Ok(self.stores.users.fetch(&user.id).await?.into())
    }

    pub async fn update_profile(
        &self,
        user: &CurrentUser,
        request: UpdateProfileRequest,
    ) -> LezitResult<UserProfile> {
        request.validate()?;

        if request.company_name.is_some() && user.role != Role::Vendor {
            return Err(LezitError::invalid_field(
                "company_name",
                "only vendor accounts have a company name",
            ));
        }
        if request.license_number.is_some() && user.role != Role::Driver {
            return Err(LezitError::invalid_field(
                "license_number",
                "only driver accounts have a license number",
            ));
        }

        let mut account = self.stores.users.fetch(&user.id).await?;
        if let Some(name) = request.name {
            account.name = name.trim().to_string();
        }
        if let Some(phone) = request.phone {
            account.phone = non_blank(Some(phone));
        }
        if let Some(company_name) = non_blank(request.company_name) {
            account.company_name = Some(company_name);
        }
        if let Some(license_number) = non_blank(request.license_number) {
            account.license_number = Some(license_number);
        }
        account.touch();

        Ok(self.stores.users.save(account).await?.into())
    }

    /// Create the configured admin unless the email is already taken
    ///
    /// Returns whether an account was created.
    pub async fn bootstrap_admin(&self, admin: &BootstrapAdmin) -> LezitResult<bool> {
        let email = normalize_email(&admin.email);
        if self.stores.users.find_one("email", &email).await?.is_some() {
            tracing::debug!(email = %email, "bootstrap admin already present");
            return Ok(false);
        }

        let user = self
            .create_account(NewAccount {
                name: admin.name.clone(),
                email,
                password: admin.password.clone(),
                phone: None,
                role: Role::Admin,
                company_name: None,
                license_number: None,
                vendor_id: None,
            })
            .await?;
        tracing::info!(user_id = %user.id, "bootstrap admin created");
        Ok(true)
    }

    pub async fn list_users(
        &self,
        caller: &CurrentUser,
        query: &QueryParams,
    ) -> LezitResult<PaginatedResponse<UserProfile>> {
        caller.require(&AuthPolicy::AdminOnly)?;
        let users = self.stores.users.list().await?;
        Ok(query.apply(users)?.map(UserProfile::from))
    }

    /// Suspend or reactivate an account
    pub async fn set_user_status(
        &self,
        caller: &CurrentUser,
        id: Uuid,
        request: SetUserStatusRequest,
    ) -> LezitResult<UserProfile> {
        caller.require(&AuthPolicy::AdminOnly)?;
        if id == caller.id && request.status == UserStatus::Suspended {
            return Err(LezitError::conflict("administrators cannot suspend themselves"));
        }

        let _guard = self.lock.lock().await;
        let mut user = self.stores.users.fetch(&id).await?;
        user.transition_to(request.status)?;
        let user = self.stores.users.save(user).await?;

        tracing::info!(user_id = %id, status = %user.status, by = %caller.id, "account status changed");
        Ok(user.into())
    }

    fn respond_with_token(&self, user: &User) -> LezitResult<AuthResponse> {
        Ok(AuthResponse {
            token: self.tokens.issue(user.id, user.role, &user.email)?,
            user: user.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support;

    fn register_request(role: Role, email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ravi".into(),
            email: email.into(),
            password: "s3cure-password".into(),
            phone: Some("+91 98765 43210".into()),
            role,
            company_name: None,
            license_number: None,
        }
    }

    #[test]
    fn test_decoy_hash_runs_a_full_verification() {
        assert!(argon2::password_hash::PasswordHash::new(DECOY_HASH).is_ok());
        assert!(!PasswordHasher::new("pepper").verify("anything", DECOY_HASH));
    }

    #[tokio::test]
    async fn test_register_normalizes_email_and_rejects_duplicates() {
        let stores = Stores::in_memory();
        let auth = test_support::auth_service(&stores);

        let response = auth
            .register(
                &AuthContext::Anonymous,
                register_request(Role::Customer, "  Ravi@Example.COM "),
            )
            .await
            .unwrap();
        assert_eq!(response.user.email, "ravi@example.com");
        assert!(!response.token.is_empty());

        let err = auth
            .register(
                &AuthContext::Anonymous,
                register_request(Role::Customer, "ravi@example.com"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "ENTITY_ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn test_role_specific_fields() {
        let stores = Stores::in_memory();
        let auth = test_support::auth_service(&stores);

        let err = auth
            .register(&AuthContext::Anonymous, register_request(Role::Vendor, "v@x.in"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("company_name"));

        let err = auth
            .register(&AuthContext::Anonymous, register_request(Role::Driver, "d@x.in"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("license_number"));

        let mut vendor = register_request(Role::Vendor, "v@x.in");
        vendor.company_name = Some("Fast Freight".into());
        vendor.license_number = Some("ignored-for-vendors".into());
        let response = auth.register(&AuthContext::Anonymous, vendor).await.unwrap();
        assert_eq!(response.user.company_name.as_deref(), Some("Fast Freight"));
        assert_eq!(response.user.license_number, None);
    }

    #[tokio::test]
    async fn test_admin_cannot_self_register() {
        let stores = Stores::in_memory();
        let auth = test_support::auth_service(&stores);

        let err = auth
            .register(&AuthContext::Anonymous, register_request(Role::Admin, "root@x.in"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "FORBIDDEN");

        let admin = test_support::account(&stores, Role::Admin).await;
        let response = auth
            .register(&admin.context(), register_request(Role::Admin, "second@x.in"))
            .await
            .unwrap();
        assert_eq!(response.user.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_login_does_not_reveal_unknown_email() {
        let stores = Stores::in_memory();
        let auth = test_support::auth_service(&stores);
        auth.register(&AuthContext::Anonymous, register_request(Role::Customer, "c@x.in"))
            .await
            .unwrap();

        let wrong_password = auth
            .login(LoginRequest {
                email: "c@x.in".into(),
                password: "not-the-password".into(),
            })
            .await
            .unwrap_err();
        let unknown_email = auth
            .login(LoginRequest {
                email: "nobody@x.in".into(),
                password: "s3cure-password".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.error_code(), "UNAUTHORIZED");

        let ok = auth
            .login(LoginRequest {
                email: "C@X.IN".into(),
                password: "s3cure-password".into(),
            })
            .await
            .unwrap();
        assert_eq!(ok.user.email, "c@x.in");
    }

    #[tokio::test]
    async fn test_suspension() {
        let stores = Stores::in_memory();
        let auth = test_support::auth_service(&stores);
        let admin = test_support::account(&stores, Role::Admin).await;
        let customer = auth
            .register(&AuthContext::Anonymous, register_request(Role::Customer, "s@x.in"))
            .await
            .unwrap()
            .user;

        let suspended = auth
            .set_user_status(
                &admin,
                customer.id,
                SetUserStatusRequest {
                    status: UserStatus::Suspended,
                },
            )
            .await
            .unwrap();
        assert_eq!(suspended.status, UserStatus::Suspended);

        let err = auth
            .login(LoginRequest {
                email: "s@x.in".into(),
                password: "s3cure-password".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "FORBIDDEN");

        let err = auth
            .set_user_status(
                &admin,
                admin.id,
                SetUserStatusRequest {
                    status: UserStatus::Suspended,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "WORKFLOW_CONFLICT");
    }

    #[tokio::test]
    async fn test_bootstrap_admin_is_idempotent() {
        let stores = Stores::in_memory();
        let auth = test_support::auth_service(&stores);
        let admin = BootstrapAdmin {
            name: "Ops".into(),
            email: "ops@lezit.in".into(),
            password: "initial-password".into(),
        };

        assert!(auth.bootstrap_admin(&admin).await.unwrap());
        assert!(!auth.bootstrap_admin(&admin).await.unwrap());
        assert_eq!(stores.users.search("role", "admin").await.unwrap().len(), 1);
    }
}
