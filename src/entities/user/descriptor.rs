//! Entity descriptor for User

use super::handlers::{list_users, login, me, register, set_user_status, update_me};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::ServerHost;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

/// Accounts: `/auth/*` for the caller, `/admin/users` for administrators
pub struct UserDescriptor;

impl EntityDescriptor for UserDescriptor {
    fn entity_type(&self) -> &str {
        "user"
    }

    fn plural(&self) -> &str {
        "users"
    }

    fn build_routes(&self) -> Router<Arc<ServerHost>> {
        Router::new()
            .route("/auth/register", post(register))
            .route("/auth/login", post(login))
            .route("/auth/me", get(me).put(update_me))
            .route("/admin/users", get(list_users))
            .route("/admin/users/{id}/status", post(set_user_status))
    }
}
