//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error responses carry a stable code and the expected details
//! - External errors convert into the right category

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use lezit::core::error::{
    ConfigError, EntityError, LezitError, RequestError, StorageError, ValidationError,
    WorkflowError,
};
use serde_json::Value;
use uuid::Uuid;

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_entity_not_found_returns_404() {
        let err = LezitError::not_found("booking", Uuid::new_v4());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "ENTITY_NOT_FOUND");
    }

    #[test]
    fn test_entity_already_exists_returns_409() {
        let err = LezitError::already_exists("vehicle", "registration_number", "MH12AB1234");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "ENTITY_ALREADY_EXISTS");
    }

    #[test]
    fn test_validation_error_returns_400() {
        let err = LezitError::invalid_field("pickup_date", "must be in the future");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_unauthorized_returns_401() {
        let err = LezitError::unauthorized("missing bearer token");
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.error_code(), "UNAUTHORIZED");
    }

    #[test]
    fn test_forbidden_returns_403() {
        let err = LezitError::forbidden("vendor role required");
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.error_code(), "FORBIDDEN");
    }

    #[test]
    fn test_invalid_body_returns_400() {
        let err: LezitError = RequestError::InvalidBody {
            message: "expected value at line 1".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_BODY");
    }

    #[test]
    fn test_invalid_transition_returns_409() {
        let err: LezitError = WorkflowError::InvalidTransition {
            entity_type: "booking".to_string(),
            from: "completed".to_string(),
            to: "cancelled".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
    }

    #[test]
    fn test_precondition_returns_409() {
        let err = LezitError::conflict("booking has no accepted purchase order");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "WORKFLOW_CONFLICT");
    }

    #[test]
    fn test_storage_and_config_errors_return_500() {
        let storage: LezitError = StorageError::QueryError {
            backend: "mongodb".to_string(),
            message: "timeout".to_string(),
        }
        .into();
        assert_eq!(storage.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(storage.error_code(), "STORAGE_ERROR");

        let config: LezitError = ConfigError::IoError {
            message: "missing file".to_string(),
        }
        .into();
        assert_eq!(config.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(config.error_code(), "CONFIG_ERROR");

        let internal = LezitError::Internal("boom".to_string());
        assert_eq!(internal.error_code(), "INTERNAL_ERROR");
    }
}

// =============================================================================
// Response Format Tests
// =============================================================================

mod response_format_tests {
    use super::*;

    async fn body_of(err: LezitError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_into_response_writes_code_and_message() {
        let (status, body) = body_of(LezitError::forbidden("admin role required")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN");
        assert!(body["message"].as_str().unwrap().contains("admin role required"));
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_not_found_response_has_details() {
        let id = Uuid::new_v4();
        let (status, body) = body_of(LezitError::not_found("quotation", id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["details"]["entity_type"], "quotation");
        assert_eq!(body["details"]["id"], id.to_string());
    }

    #[tokio::test]
    async fn test_invalid_transition_response_names_both_states() {
        let err: LezitError = WorkflowError::InvalidTransition {
            entity_type: "sales_order".to_string(),
            from: "paid".to_string(),
            to: "cancelled".to_string(),
        }
        .into();
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["details"]["from"], "paid");
        assert_eq!(body["details"]["to"], "cancelled");
    }

    #[test]
    fn test_entity_error_messages() {
        let err = EntityError::AlreadyExists {
            entity_type: "user".to_string(),
            field: "email".to_string(),
            value: "asha@lezit.in".to_string(),
        };
        assert_eq!(err.to_string(), "user with email 'asha@lezit.in' already exists");
    }

    #[test]
    fn test_config_parse_error_names_file() {
        let with_file = ConfigError::ParseError {
            file: Some("lezit.yaml".to_string()),
            message: "bad indent".to_string(),
        };
        assert!(with_file.to_string().contains("'lezit.yaml'"));

        let without_file = ConfigError::ParseError {
            file: None,
            message: "bad indent".to_string(),
        };
        assert_eq!(without_file.to_string(), "Failed to parse config: bad indent");
    }
}

// =============================================================================
// Conversion Tests
// =============================================================================

mod conversion_tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(email)]
        email: String,
        #[validate(range(min = 1))]
        pieces: i64,
    }

    #[test]
    fn test_from_validator_errors_collects_sorted_fields() {
        let sample = Sample {
            email: "not-an-email".to_string(),
            pieces: 0,
        };
        let err: LezitError = sample.validate().unwrap_err().into();

        match &err {
            LezitError::Validation(ValidationError::FieldErrors(fields)) => {
                let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["email", "pieces"]);
            }
            other => panic!("expected field errors, got {other:?}"),
        }

        let body = err.to_response();
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert_eq!(body.details.unwrap()["fields"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<Value>("{ nope").unwrap_err();
        let err: LezitError = json_err.into();
        assert!(matches!(
            err,
            LezitError::Validation(ValidationError::InvalidJson { .. })
        ));
    }

    #[test]
    fn test_from_uuid_error() {
        let uuid_err = Uuid::parse_str("not-a-uuid").unwrap_err();
        let err: LezitError = uuid_err.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_from_anyhow_keeps_storage_errors() {
        let storage = anyhow::Error::new(StorageError::ConnectionError {
            backend: "mongodb".to_string(),
            message: "refused".to_string(),
        });
        let err: LezitError = storage.into();
        assert!(matches!(err, LezitError::Storage(_)));

        let other: LezitError = anyhow::anyhow!("disk on fire").into();
        assert!(matches!(other, LezitError::Internal(_)));
    }

    #[test]
    fn test_client_can_match_specific_cases() {
        let err = LezitError::conflict("vehicle is on a trip");
        let handled = match err {
            LezitError::Workflow(WorkflowError::Precondition { message }) => message,
            _ => String::new(),
        };
        assert_eq!(handled, "vehicle is on a trip");
    }
}
