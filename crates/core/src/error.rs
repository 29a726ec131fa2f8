//! Error taxonomy shared by every flow.
//!
//! `ValidationError` is raised before any remote call is made. `GenerationFailure`
//! covers everything that can go wrong once a prompt has been sent.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// The specific rule a field failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// The field is missing (or `null`).
    Required,
    /// The string is shorter than allowed once surrounding whitespace is ignored.
    MinLength { min: usize, actual: usize },
    /// The value has the wrong JSON type.
    TypeMismatch { expected: &'static str },
    /// The string is not one of the allowed values.
    EnumMismatch { allowed: &'static [&'static str] },
    /// The number is below the allowed minimum.
    Minimum { min: i64 },
    /// The document (or a nested element) is not a JSON object.
    NotAnObject,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Required => write!(f, "is required"),
            Constraint::MinLength { min, actual } => {
                write!(f, "must be at least {} characters (got {})", min, actual)
            }
            Constraint::TypeMismatch { expected } => write!(f, "must be {}", expected),
            Constraint::EnumMismatch { allowed } => {
                write!(f, "must be one of: {}", allowed.join(", "))
            }
            Constraint::Minimum { min } => write!(f, "must be at least {}", min),
            Constraint::NotAnObject => write!(f, "must be a JSON object"),
        }
    }
}

/// A field-level contract failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}' {constraint}")]
pub struct ValidationError {
    /// Wire name of the field, with an index path for nested elements.
    pub field: String,
    pub constraint: Constraint,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            field: field.into(),
            constraint,
        }
    }
}

/// Anything that went wrong after a prompt was handed to the remote model.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("remote generation call failed: {0}")]
    Remote(String),
    #[error("remote generation call timed out after {0:?}")]
    Timeout(Duration),
    #[error("remote generation returned no content")]
    EmptyResponse,
    #[error("remote generation returned malformed JSON: {0}")]
    MalformedResponse(String),
    #[error("response violates the output schema: {0}")]
    SchemaViolation(#[from] ValidationError),
    /// The response has the right shape but breaks a semantic rule
    /// (an answer missing from its options, an unusable SVG document).
    #[error("response breaks the output contract: {0}")]
    Contract(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_field_and_rule() {
        let err = ValidationError::new("concept", Constraint::MinLength { min: 1, actual: 0 });
        assert_eq!(
            err.to_string(),
            "field 'concept' must be at least 1 characters (got 0)"
        );

        let err = ValidationError::new(
            "quizQuestions[0].difficulty",
            Constraint::EnumMismatch {
                allowed: &["easy", "medium", "hard"],
            },
        );
        assert_eq!(
            err.to_string(),
            "field 'quizQuestions[0].difficulty' must be one of: easy, medium, hard"
        );
    }

    #[test]
    fn schema_violation_converts_into_generation_failure() {
        let failure: GenerationFailure =
            ValidationError::new("learningPath", Constraint::Required).into();
        assert!(matches!(failure, GenerationFailure::SchemaViolation(_)));
        assert!(failure.to_string().contains("learningPath"));
    }
}
