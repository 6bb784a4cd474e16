//! Error taxonomy for failed attempts and gate management operations

use thiserror::Error;

use crate::codes;

/// Coarse classification of an authentication error code
///
/// Every failure path ends in a normal [`crate::AuthOutcome`]; this enum
/// only buckets the code for callers that branch on the failure class
/// rather than the exact code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// No usable hardware, nothing enrolled, or no passcode set
    CapabilityUnavailable,

    /// Too many failed attempts; biometric input temporarily disabled
    LockedOut,

    /// User dismissed the challenge
    UserCancelled,

    /// The OS or the application aborted the challenge
    SystemCancelled,

    /// User asked for the fallback path instead
    FallbackRequested,

    /// The authentication session was invalidated before completion
    ContextInvalidated,

    /// Presented credentials did not match
    AuthenticationFailed,

    /// Gate-level rejection of an overlapping authenticate call
    AttemptInProgress,

    /// Any code not covered by the above
    Unknown,
}

impl AuthErrorKind {
    /// Bucket an error code. Total over the whole code space.
    pub fn from_code(code: i32) -> Self {
        match code {
            codes::PASSCODE_NOT_SET
            | codes::BIOMETRY_NOT_AVAILABLE
            | codes::BIOMETRY_NOT_ENROLLED => AuthErrorKind::CapabilityUnavailable,
            codes::BIOMETRY_LOCKOUT => AuthErrorKind::LockedOut,
            codes::USER_CANCEL => AuthErrorKind::UserCancelled,
            codes::SYSTEM_CANCEL | codes::APP_CANCEL => AuthErrorKind::SystemCancelled,
            codes::USER_FALLBACK => AuthErrorKind::FallbackRequested,
            codes::INVALID_CONTEXT => AuthErrorKind::ContextInvalidated,
            codes::AUTHENTICATION_FAILED => AuthErrorKind::AuthenticationFailed,
            codes::ATTEMPT_IN_PROGRESS => AuthErrorKind::AttemptInProgress,
            _ => AuthErrorKind::Unknown,
        }
    }
}

/// Errors from gate management operations (enrollment, platform calls)
#[derive(Error, Debug)]
pub enum GateError {
    #[error("Biometric authentication is not supported on this platform")]
    Unsupported,

    #[error("Keychain operation failed: {0}")]
    Keychain(String),
}

pub type GateResult<T> = Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_codes_share_a_bucket() {
        for code in [
            codes::PASSCODE_NOT_SET,
            codes::BIOMETRY_NOT_AVAILABLE,
            codes::BIOMETRY_NOT_ENROLLED,
        ] {
            assert_eq!(
                AuthErrorKind::from_code(code),
                AuthErrorKind::CapabilityUnavailable
            );
        }
    }

    #[test]
    fn test_distinct_buckets() {
        assert_eq!(
            AuthErrorKind::from_code(codes::BIOMETRY_LOCKOUT),
            AuthErrorKind::LockedOut
        );
        assert_eq!(
            AuthErrorKind::from_code(codes::USER_CANCEL),
            AuthErrorKind::UserCancelled
        );
        assert_eq!(
            AuthErrorKind::from_code(codes::APP_CANCEL),
            AuthErrorKind::SystemCancelled
        );
        assert_eq!(
            AuthErrorKind::from_code(codes::USER_FALLBACK),
            AuthErrorKind::FallbackRequested
        );
        assert_eq!(
            AuthErrorKind::from_code(codes::INVALID_CONTEXT),
            AuthErrorKind::ContextInvalidated
        );
        assert_eq!(
            AuthErrorKind::from_code(codes::AUTHENTICATION_FAILED),
            AuthErrorKind::AuthenticationFailed
        );
        assert_eq!(
            AuthErrorKind::from_code(codes::ATTEMPT_IN_PROGRESS),
            AuthErrorKind::AttemptInProgress
        );
    }

    #[test]
    fn test_unmapped_codes_are_unknown() {
        assert_eq!(AuthErrorKind::from_code(0), AuthErrorKind::Unknown);
        assert_eq!(
            AuthErrorKind::from_code(codes::NOT_INTERACTIVE),
            AuthErrorKind::Unknown
        );
        assert_eq!(AuthErrorKind::from_code(-500), AuthErrorKind::Unknown);
    }
}
