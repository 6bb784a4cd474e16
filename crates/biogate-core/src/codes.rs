//! Platform authentication error codes and their fixed descriptions
//!
//! The code space mirrors the platform policy-evaluation errors. All
//! platform codes are negative; gate-level codes are positive, so the two
//! spaces cannot collide.

/// Presented credentials did not match
pub const AUTHENTICATION_FAILED: i32 = -1;

/// User dismissed the challenge
pub const USER_CANCEL: i32 = -2;

/// User tapped the fallback button
pub const USER_FALLBACK: i32 = -3;

/// The OS aborted the challenge
pub const SYSTEM_CANCEL: i32 = -4;

/// No device passcode is configured
pub const PASSCODE_NOT_SET: i32 = -5;

/// No usable biometric hardware
pub const BIOMETRY_NOT_AVAILABLE: i32 = -6;

/// No biometric credentials enrolled
pub const BIOMETRY_NOT_ENROLLED: i32 = -7;

/// Too many failed attempts; biometric input disabled until passcode unlock
pub const BIOMETRY_LOCKOUT: i32 = -8;

/// The application aborted the challenge
pub const APP_CANCEL: i32 = -9;

/// The authentication session was invalidated before completion
pub const INVALID_CONTEXT: i32 = -10;

/// The challenge would require UI that interaction settings forbid
pub const NOT_INTERACTIVE: i32 = -1004;

/// Gate-level: another attempt is already pending on the same authenticator
pub const ATTEMPT_IN_PROGRESS: i32 = 1;

/// Description returned for codes outside the known set
pub const UNKNOWN_ERROR: &str = "unknown error";

/// Map an authentication error code to its fixed human-readable description.
///
/// Pure and total: every known code has exactly one sentence, and anything
/// outside the known set falls through to [`UNKNOWN_ERROR`].
pub fn describe_error(code: i32) -> &'static str {
    match code {
        AUTHENTICATION_FAILED => {
            "Authentication was not successful, because user failed to provide valid credentials"
        }
        USER_CANCEL => "Authentication was canceled by user",
        USER_FALLBACK => {
            "Authentication was canceled, because the user tapped the fallback button"
        }
        SYSTEM_CANCEL => "Authentication was canceled by system",
        PASSCODE_NOT_SET => {
            "Authentication could not start, because passcode is not set on the device"
        }
        BIOMETRY_NOT_AVAILABLE => {
            "Authentication could not start, because biometry is not available on the device"
        }
        BIOMETRY_NOT_ENROLLED => {
            "Authentication could not start, because biometric authentication is not enrolled"
        }
        BIOMETRY_LOCKOUT => {
            "Authentication was not successful, because there were too many failed biometry attempts and biometry is now locked"
        }
        APP_CANCEL => "Authentication was canceled by application",
        INVALID_CONTEXT => "LAContext passed to this call has been previously invalidated",
        NOT_INTERACTIVE => {
            "Authentication failed, because it would require showing UI which has been forbidden by using interactionNotAllowed property"
        }
        ATTEMPT_IN_PROGRESS => {
            "Authentication could not start, because another attempt is already in progress"
        }
        _ => UNKNOWN_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_have_fixed_messages() {
        assert_eq!(
            describe_error(AUTHENTICATION_FAILED),
            "Authentication was not successful, because user failed to provide valid credentials"
        );
        assert_eq!(describe_error(USER_CANCEL), "Authentication was canceled by user");
        assert_eq!(
            describe_error(USER_FALLBACK),
            "Authentication was canceled, because the user tapped the fallback button"
        );
        assert_eq!(describe_error(SYSTEM_CANCEL), "Authentication was canceled by system");
        assert_eq!(
            describe_error(PASSCODE_NOT_SET),
            "Authentication could not start, because passcode is not set on the device"
        );
        assert_eq!(
            describe_error(BIOMETRY_NOT_AVAILABLE),
            "Authentication could not start, because biometry is not available on the device"
        );
        assert_eq!(
            describe_error(BIOMETRY_NOT_ENROLLED),
            "Authentication could not start, because biometric authentication is not enrolled"
        );
        assert_eq!(
            describe_error(BIOMETRY_LOCKOUT),
            "Authentication was not successful, because there were too many failed biometry attempts and biometry is now locked"
        );
        assert_eq!(
            describe_error(APP_CANCEL),
            "Authentication was canceled by application"
        );
        assert_eq!(
            describe_error(INVALID_CONTEXT),
            "LAContext passed to this call has been previously invalidated"
        );
        assert_eq!(
            describe_error(NOT_INTERACTIVE),
            "Authentication failed, because it would require showing UI which has been forbidden by using interactionNotAllowed property"
        );
        assert_eq!(
            describe_error(ATTEMPT_IN_PROGRESS),
            "Authentication could not start, because another attempt is already in progress"
        );
    }

    #[test]
    fn test_unknown_codes_get_generic_message() {
        for code in [0, 2, 42, -11, -999, i32::MIN, i32::MAX] {
            assert_eq!(describe_error(code), UNKNOWN_ERROR);
        }
    }
}
