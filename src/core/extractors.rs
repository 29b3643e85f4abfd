//! Axum extractors for callers and request bodies
//!
//! - [`CurrentUser`]: requires a valid bearer token for an active account
//! - [`AuthContext`]: same check, but anonymous callers are let through
//! - [`JsonBody`]: JSON body whose rejections render as [`LezitError`]

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::auth::{AuthContext, AuthPolicy, Role};
use crate::core::error::{LezitError, LezitResult, RequestError};
use crate::core::service::DataService;
use crate::entities::user::UserStatus;
use crate::server::host::ServerHost;

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: Role,
    pub email: String,
}

impl CurrentUser {
    pub fn context(&self) -> AuthContext {
        AuthContext::User {
            user_id: self.id,
            role: self.role,
            email: self.email.clone(),
        }
    }

    /// Fail with 403 unless the caller satisfies `policy`
    pub fn require(&self, policy: &AuthPolicy) -> LezitResult<()> {
        policy.enforce(&self.context())
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl FromRequestParts<Arc<ServerHost>> for CurrentUser {
    type Rejection = LezitError;

    async fn from_request_parts(
        parts: &mut Parts,
        host: &Arc<ServerHost>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| LezitError::unauthorized("missing bearer token"))?;
        authenticate(host, &token).await
    }
}

impl FromRequestParts<Arc<ServerHost>> for AuthContext {
    type Rejection = LezitError;

    async fn from_request_parts(
        parts: &mut Parts,
        host: &Arc<ServerHost>,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => Ok(authenticate(host, &token).await?.context()),
            None => Ok(AuthContext::Anonymous),
        }
    }
}

fn bearer_token(parts: &Parts) -> LezitResult<Option<String>> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| LezitError::unauthorized("malformed authorization header"))?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| Some(token.to_string()))
        .ok_or_else(|| LezitError::unauthorized("expected a bearer token"))
}

/// Resolve a token to an active account
///
/// The role is read from the stored account, so role or status changes take
/// effect before the token expires.
async fn authenticate(host: &ServerHost, token: &str) -> LezitResult<CurrentUser> {
    let claims = host.tokens.verify(token).inspect_err(|e| {
        tracing::warn!(error = %e, "rejected bearer token");
    })?;

    let user = host
        .stores
        .users
        .get(&claims.sub)
        .await?
        .ok_or_else(|| LezitError::unauthorized("account no longer exists"))?;

    if user.status == UserStatus::Suspended {
        return Err(LezitError::forbidden("account suspended"));
    }

    Ok(CurrentUser {
        id: user.id,
        role: user.role,
        email: user.email,
    })
}

/// JSON request body
///
/// Like [`axum::Json`], but malformed bodies answer with the API's error
/// envelope (`400 INVALID_BODY`).
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = LezitError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(RequestError::InvalidBody {
                message: rejection.body_text(),
            }
            .into()),
        }
    }
}
