//! Authentication session.
//!
//! The session starts in `Loading` and leaves it only when a check resolves.
//! Every check is tagged with a [`CheckToken`]; resolutions carrying anything
//! but the most recent token are discarded, which covers both a superseding
//! check and a logout that happened while the check was in flight.

use async_trait::async_trait;
use doco_model::{AuthFailure, AuthStatus, User};

/// External collaborator that knows whether a valid session exists.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// `Ok(None)` means no session (anonymous), not a failure.
    async fn verify_session(&self) -> Result<Option<User>, AuthFailure>;
}

/// Provider returning a fixed outcome.
#[derive(Debug, Clone)]
pub struct StaticAuthProvider {
    outcome: Result<Option<User>, AuthFailure>,
}

impl StaticAuthProvider {
    pub fn authenticated(user: User) -> Self {
        Self {
            outcome: Ok(Some(user)),
        }
    }

    pub fn anonymous() -> Self {
        Self { outcome: Ok(None) }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(AuthFailure::new(message)),
        }
    }
}

#[async_trait]
impl AuthProvider for StaticAuthProvider {
    async fn verify_session(&self) -> Result<Option<User>, AuthFailure> {
        self.outcome.clone()
    }
}

/// Identifies one outstanding session check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CheckToken(u64);

impl CheckToken {
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct AuthSession {
    status: AuthStatus,
    generation: u64,
    pending: Option<CheckToken>,
    last_failure: Option<AuthFailure>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &AuthStatus {
        &self.status
    }

    pub fn user(&self) -> Option<&User> {
        self.status.user()
    }

    /// Failure reported by the last resolved check, if it failed.
    pub fn last_failure(&self) -> Option<&AuthFailure> {
        self.last_failure.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a check. Any earlier outstanding check becomes stale.
    pub fn begin_check(&mut self) -> CheckToken {
        self.generation += 1;
        let token = CheckToken(self.generation);
        self.pending = Some(token);
        self.status = AuthStatus::Loading;
        token
    }

    pub fn is_current(&self, token: CheckToken) -> bool {
        self.pending == Some(token)
    }

    /// Apply the outcome of a check.
    ///
    /// Returns `false` and leaves the session untouched when `token` is stale.
    pub fn resolve(
        &mut self,
        token: CheckToken,
        outcome: Result<Option<User>, AuthFailure>,
    ) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.pending = None;
        match outcome {
            Ok(Some(user)) => {
                self.status = AuthStatus::Authenticated(user);
                self.last_failure = None;
            }
            Ok(None) => {
                self.status = AuthStatus::Anonymous;
                self.last_failure = None;
            }
            Err(failure) => {
                self.status = AuthStatus::Anonymous;
                self.last_failure = Some(failure);
            }
        }
        true
    }

    /// End the session. Outstanding checks are invalidated.
    pub fn logout(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.status = AuthStatus::Anonymous;
        self.last_failure = None;
    }
}
