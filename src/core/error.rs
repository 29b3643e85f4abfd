//! Typed error handling for the Lezit API
//!
//! Every HTTP-facing operation returns [`LezitResult`]. The error hierarchy
//! lets handlers and clients tell apart a missing record, a rejected
//! credential, an illegal status change and a storage outage instead of
//! dealing with a generic `anyhow::Error`.
//!
//! # Error Categories
//!
//! - [`EntityError`]: lookups and uniqueness of stored records
//! - [`ValidationError`]: malformed or incomplete input
//! - [`RequestError`]: authentication and authorization failures
//! - [`WorkflowError`]: lifecycle transitions and workflow preconditions
//! - [`StorageError`]: storage backend failures
//! - [`ConfigError`]: configuration parsing and validation
//!
//! # Example
//!
//! ```rust,ignore
//! let booking = stores
//!     .bookings
//!     .get(&id)
//!     .await?
//!     .ok_or_else(|| LezitError::not_found("booking", id))?;
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// The main error type of the API
#[derive(Debug, Error)]
pub enum LezitError {
    /// Record lookups and uniqueness
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Input validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Authentication / authorization
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Lifecycle and workflow rules
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Storage backend errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Unexpected internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl LezitError {
    /// Shorthand for a missing record
    pub fn not_found(entity_type: &str, id: Uuid) -> Self {
        EntityError::NotFound {
            entity_type: entity_type.to_string(),
            id,
        }
        .into()
    }

    /// Shorthand for a uniqueness violation
    pub fn already_exists(entity_type: &str, field: &str, value: impl Into<String>) -> Self {
        EntityError::AlreadyExists {
            entity_type: entity_type.to_string(),
            field: field.to_string(),
            value: value.into(),
        }
        .into()
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        RequestError::Unauthorized {
            message: message.into(),
        }
        .into()
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        RequestError::Forbidden {
            message: message.into(),
        }
        .into()
    }

    /// Shorthand for a single invalid field
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        ValidationError::FieldError {
            field: field.to_string(),
            message: message.into(),
        }
        .into()
    }

    /// Shorthand for a workflow precondition that does not hold
    pub fn conflict(message: impl Into<String>) -> Self {
        WorkflowError::Precondition {
            message: message.into(),
        }
        .into()
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            LezitError::Entity(e) => e.status_code(),
            LezitError::Validation(_) => StatusCode::BAD_REQUEST,
            LezitError::Request(e) => e.status_code(),
            LezitError::Workflow(_) => StatusCode::CONFLICT,
            LezitError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LezitError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LezitError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            LezitError::Entity(e) => e.error_code(),
            LezitError::Validation(_) => "VALIDATION_ERROR",
            LezitError::Request(e) => e.error_code(),
            LezitError::Workflow(e) => e.error_code(),
            LezitError::Storage(_) => "STORAGE_ERROR",
            LezitError::Config(_) => "CONFIG_ERROR",
            LezitError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response body
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            LezitError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id.to_string()
                }))
            }
            LezitError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            LezitError::Workflow(WorkflowError::InvalidTransition {
                entity_type,
                from,
                to,
            }) => Some(serde_json::json!({
                "entity_type": entity_type,
                "from": from,
                "to": to
            })),
            _ => None,
        }
    }
}

impl IntoResponse for LezitError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to stored records
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: Uuid },

    #[error("{entity_type} with {field} '{value}' already exists")]
    AlreadyExists {
        entity_type: String,
        field: String,
        value: String,
    },
}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::AlreadyExists { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::AlreadyExists { .. } => "ENTITY_ALREADY_EXISTS",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Validation error for field '{field}': {message}")]
    FieldError { field: String, message: String },

    #[error("Validation errors: {}", format_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    #[error("Invalid UUID format: {value}")]
    InvalidUuid { value: String },
}

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn format_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to the caller's identity and permissions
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RequestError::Forbidden { .. } => StatusCode::FORBIDDEN,
            RequestError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
            RequestError::Forbidden { .. } => "FORBIDDEN",
            RequestError::InvalidBody { .. } => "INVALID_BODY",
        }
    }
}

// =============================================================================
// Workflow Errors
// =============================================================================

/// Errors raised by lifecycle checks and workflow preconditions
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Cannot move {entity_type} from '{from}' to '{to}'")]
    InvalidTransition {
        entity_type: String,
        from: String,
        to: String,
    },

    #[error("{message}")]
    Precondition { message: String },
}

impl WorkflowError {
    pub fn error_code(&self) -> &'static str {
        match self {
            WorkflowError::InvalidTransition { .. } => "INVALID_TRANSITION",
            WorkflowError::Precondition { .. } => "WORKFLOW_CONFLICT",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to connect to {backend}: {message}")]
    ConnectionError { backend: String, message: String },

    #[error("{backend} query error: {message}")]
    QueryError { backend: String, message: String },
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{f}'")).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    #[error("IO error: {message}")]
    IoError { message: String },
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for LezitError {
    fn from(err: serde_json::Error) -> Self {
        LezitError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for LezitError {
    fn from(err: serde_yaml::Error) -> Self {
        LezitError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for LezitError {
    fn from(err: std::io::Error) -> Self {
        LezitError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<uuid::Error> for LezitError {
    fn from(err: uuid::Error) -> Self {
        LezitError::Validation(ValidationError::InvalidUuid {
            value: err.to_string(),
        })
    }
}

impl From<validator::ValidationErrors> for LezitError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldValidationError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        LezitError::Validation(ValidationError::FieldErrors(fields))
    }
}

impl From<jsonwebtoken::errors::Error> for LezitError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        let message = match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => "token expired".to_string(),
            _ => format!("invalid token: {}", err),
        };
        LezitError::unauthorized(message)
    }
}

/// Storage seam errors surface as internal errors
impl From<anyhow::Error> for LezitError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<StorageError>() {
            Ok(storage) => LezitError::Storage(storage),
            Err(other) => LezitError::Internal(other.to_string()),
        }
    }
}

/// A specialized Result type for API operations
pub type LezitResult<T> = Result<T, LezitError>;
