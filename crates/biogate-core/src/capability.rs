//! Device authentication capability

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the device can offer for an authentication challenge
///
/// Derived from a silent platform probe once per attempt; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiometricCapability {
    /// A face-recognition-capable sensor is present
    FaceRecognition,

    /// A fingerprint-capable sensor is present
    FingerprintRecognition,

    /// No biometric sensor; the device passcode is the only factor
    PasscodeOnly,
}

impl BiometricCapability {
    /// Whether a biometric sensor (rather than passcode entry) backs the challenge
    pub fn is_biometric(&self) -> bool {
        !matches!(self, BiometricCapability::PasscodeOnly)
    }
}

impl fmt::Display for BiometricCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BiometricCapability::FaceRecognition => "face recognition",
            BiometricCapability::FingerprintRecognition => "fingerprint recognition",
            BiometricCapability::PasscodeOnly => "passcode only",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_biometric_flag() {
        assert!(BiometricCapability::FaceRecognition.is_biometric());
        assert!(BiometricCapability::FingerprintRecognition.is_biometric());
        assert!(!BiometricCapability::PasscodeOnly.is_biometric());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            BiometricCapability::FingerprintRecognition.to_string(),
            "fingerprint recognition"
        );
    }
}
