//! Biogate Core - Device-capability-aware biometric authentication gate
//!
//! This crate provides:
//! - Silent probing of the device's biometric capability (face / fingerprint / passcode-only)
//! - Single-shot asynchronous challenges with an exactly-once completion callback
//! - A fixed mapping from platform error codes to human-readable descriptions
//! - Platform backends: the host OS subsystem (Touch ID on macOS) and a scripted simulator

pub mod authenticator;
pub mod capability;
pub mod codes;
pub mod error;
pub mod outcome;
pub mod platform;

pub use authenticator::*;
pub use capability::*;
pub use codes::describe_error;
pub use error::*;
pub use outcome::*;
pub use platform::*;
