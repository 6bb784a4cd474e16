//! The authentication gate
//!
//! Probes device capability, runs a single-shot platform challenge, and
//! delivers a normalized [`AuthOutcome`] to a completion callback exactly
//! once per call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::capability::BiometricCapability;
use crate::codes;
use crate::outcome::AuthOutcome;
use crate::platform::{PlatformContext, SystemPlatform};

/// Device-capability-aware authentication gate
///
/// One attempt is in flight per instance at a time; an overlapping
/// `authenticate` call fails immediately with
/// [`codes::ATTEMPT_IN_PROGRESS`] while the pending attempt runs to
/// completion untouched.
pub struct Authenticator<P: PlatformContext> {
    platform: Arc<P>,
    in_flight: Arc<AtomicBool>,
}

impl Authenticator<SystemPlatform> {
    /// Gate backed by the host OS biometric subsystem
    pub fn system(account: impl Into<String>) -> Self {
        Self::new(SystemPlatform::new(account))
    }
}

impl<P: PlatformContext> Authenticator<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform: Arc::new(platform),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The backend this gate drives
    pub fn platform(&self) -> Arc<P> {
        Arc::clone(&self.platform)
    }

    /// Silent capability probe; never prompts the user
    pub fn detect_capability(&self) -> BiometricCapability {
        self.platform.capability()
    }

    /// Run one authentication challenge
    ///
    /// Re-probes evaluability first: if the challenge cannot be presented
    /// right now, a failure outcome synthesized from the probe's error code
    /// is delivered without the user ever seeing a prompt. Otherwise the
    /// platform challenge is shown with `reason`.
    ///
    /// `on_complete` is invoked exactly once per call, on success and on
    /// every failure path, from a background blocking task. Callers that
    /// touch UI state must re-marshal to their own context. No retries are
    /// performed; a failed or cancelled attempt requires calling
    /// `authenticate` again.
    ///
    /// Must be called from within a tokio runtime.
    pub fn authenticate<F>(&self, reason: impl Into<String>, on_complete: F)
    where
        F: FnOnce(AuthOutcome) + Send + 'static,
    {
        let attempt = Uuid::new_v4();

        if self.in_flight.swap(true, Ordering::SeqCst) {
            warn!(%attempt, "rejecting overlapping authentication attempt");
            on_complete(AuthOutcome::failure(codes::ATTEMPT_IN_PROGRESS));
            return;
        }

        let reason = reason.into();
        let platform = Arc::clone(&self.platform);
        let in_flight = Arc::clone(&self.in_flight);

        debug!(%attempt, %reason, "starting authentication attempt");

        tokio::task::spawn_blocking(move || {
            let outcome = match platform.can_evaluate() {
                Err(code) => {
                    info!(%attempt, code, "challenge not evaluable, failing without prompt");
                    AuthOutcome::failure(code)
                }
                Ok(()) => match platform.evaluate(&reason) {
                    Ok(()) => AuthOutcome::success(),
                    Err(code) => AuthOutcome::failure(code),
                },
            };

            if outcome.succeeded {
                info!(%attempt, "authentication succeeded");
            } else {
                info!(%attempt, code = ?outcome.error_code, "authentication failed");
            }

            // Clear before delivery so the callback may start a new attempt
            in_flight.store(false, Ordering::SeqCst);
            on_complete(outcome);
        });
    }
}
