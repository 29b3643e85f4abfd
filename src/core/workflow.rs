//! Status lifecycles
//!
//! Every entity status is a closed enum with an explicit table of allowed
//! successors. Handlers never write a status directly; they ask the entity
//! to transition and get a [`WorkflowError::InvalidTransition`] back when
//! the table forbids it.

use crate::core::error::{LezitError, WorkflowError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::{Debug, Display};

/// A status enum with a transition table
///
/// Implemented by the [`lifecycle!`](crate::lifecycle) macro.
pub trait Lifecycle:
    Copy + Eq + Debug + Display + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Name of the owning entity, used in error messages
    const ENTITY: &'static str;

    /// Every variant, in declaration order
    fn all() -> &'static [Self];

    /// Statuses reachable in one step from `self`
    fn allowed_next(&self) -> &'static [Self];

    /// Wire name of the status (`"in_transit"`)
    fn as_str(&self) -> &'static str;

    fn can_transition_to(&self, next: Self) -> bool {
        self.allowed_next().contains(&next)
    }

    /// No transition leaves a terminal status
    fn is_terminal(&self) -> bool {
        self.allowed_next().is_empty()
    }

    /// Parse a wire name
    fn parse(value: &str) -> Option<Self> {
        Self::all().iter().copied().find(|s| s.as_str() == value)
    }
}

/// Check a single transition without mutating anything
pub fn ensure_transition<S: Lifecycle>(from: S, to: S) -> Result<(), LezitError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        tracing::warn!(entity = S::ENTITY, %from, %to, "rejected status transition");
        Err(WorkflowError::InvalidTransition {
            entity_type: S::ENTITY.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
        .into())
    }
}

/// Parse a status from user input, reporting the allowed values on failure
pub fn parse_status<S: Lifecycle>(field: &str, value: &str) -> Result<S, LezitError> {
    S::parse(value).ok_or_else(|| {
        let allowed: Vec<&str> = S::all().iter().map(|s| s.as_str()).collect();
        LezitError::invalid_field(
            field,
            format!("must be one of {:?} (got '{}')", allowed, value),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::lifecycle!(
        /// Traffic light used to exercise the trait
        Light, "light" {
            Red => "red": [Green],
            Green => "green": [Amber],
            Amber => "amber": [Red],
            Off => "off": [],
        }
    );

    #[test]
    fn test_allowed_transitions() {
        assert!(Light::Red.can_transition_to(Light::Green));
        assert!(!Light::Red.can_transition_to(Light::Amber));
        assert!(ensure_transition(Light::Green, Light::Amber).is_ok());
    }

    #[test]
    fn test_invalid_transition_is_workflow_error() {
        let err = ensure_transition(Light::Amber, Light::Green).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert!(err.to_string().contains("light"));
        assert!(err.to_string().contains("'amber'"));
    }

    #[test]
    fn test_terminal() {
        assert!(Light::Off.is_terminal());
        assert!(!Light::Red.is_terminal());
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(Light::parse("amber"), Some(Light::Amber));
        assert_eq!(Light::parse("blue"), None);
        assert_eq!(Light::Green.to_string(), "green");
        assert_eq!(serde_json::to_value(Light::Off).unwrap(), "off");

        let err = parse_status::<Light>("status", "blue").unwrap_err();
        assert!(err.to_string().contains("red"));
    }
}
