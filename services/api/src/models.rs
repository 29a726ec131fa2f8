//! HTTP-only payloads.
//!
//! Request and result bodies of the flows live in `tutor_core::models`; this
//! module only holds what the HTTP boundary adds on top of them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub message: String,
    /// Wire name of the offending field, when the error concerns one.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "concept")]
    pub field: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    pub fn for_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_response_omits_missing_field() {
        let body = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
        assert_eq!(body, json!({ "message": "boom" }));
    }

    #[test]
    fn test_error_response_names_field() {
        let body =
            serde_json::to_value(ErrorResponse::for_field("field 'goals' is required", "goals"))
                .unwrap();
        assert_eq!(body["field"], "goals");
        assert_eq!(body["message"], "field 'goals' is required");
    }
}
