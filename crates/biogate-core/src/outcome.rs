//! Outcome value delivered to the completion callback

use serde::{Deserialize, Serialize};

use crate::codes::describe_error;
use crate::error::AuthErrorKind;

/// Result of one authentication attempt
///
/// Constructed once per attempt, delivered once to the completion callback,
/// then discarded. `error_code` and `error_message` carry meaning only when
/// `succeeded` is false; a success carries `None` and an empty message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthOutcome {
    /// Whether the challenge was passed
    pub succeeded: bool,

    /// Platform or gate error code (failures only)
    pub error_code: Option<i32>,

    /// Fixed description for the error code (failures only)
    pub error_message: String,
}

impl AuthOutcome {
    /// Outcome of a passed challenge
    pub fn success() -> Self {
        Self {
            succeeded: true,
            error_code: None,
            error_message: String::new(),
        }
    }

    /// Outcome of a failed or aborted challenge
    ///
    /// The message is looked up in the fixed code table; codes outside the
    /// known set get the generic description.
    pub fn failure(code: i32) -> Self {
        Self {
            succeeded: false,
            error_code: Some(code),
            error_message: describe_error(code).to_string(),
        }
    }

    /// Taxonomy bucket for the failure; `None` on success
    pub fn error_kind(&self) -> Option<AuthErrorKind> {
        self.error_code.map(AuthErrorKind::from_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes;

    #[test]
    fn test_success_carries_no_error() {
        let outcome = AuthOutcome::success();
        assert!(outcome.succeeded);
        assert_eq!(outcome.error_code, None);
        assert!(outcome.error_message.is_empty());
        assert_eq!(outcome.error_kind(), None);
    }

    #[test]
    fn test_failure_populates_code_and_message() {
        let outcome = AuthOutcome::failure(codes::USER_CANCEL);
        assert!(!outcome.succeeded);
        assert_eq!(outcome.error_code, Some(codes::USER_CANCEL));
        assert_eq!(outcome.error_message, "Authentication was canceled by user");
        assert_eq!(outcome.error_kind(), Some(AuthErrorKind::UserCancelled));
    }

    #[test]
    fn test_failure_with_unknown_code() {
        let outcome = AuthOutcome::failure(-777);
        assert!(!outcome.succeeded);
        assert_eq!(outcome.error_code, Some(-777));
        assert_eq!(outcome.error_message, codes::UNKNOWN_ERROR);
        assert_eq!(outcome.error_kind(), Some(AuthErrorKind::Unknown));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(AuthOutcome::success()).unwrap();
        assert_eq!(json["succeeded"], true);
        assert!(json["error_code"].is_null());
    }
}
