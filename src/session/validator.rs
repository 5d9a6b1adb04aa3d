use chrono::{DateTime, Duration, Utc};

use crate::crypto::signing::SessionSigner;
use crate::crypto::token;
use crate::models::session::{Session, SessionState};

/// Default idle timeout, in minutes.
pub const DEFAULT_IDLE_TIMEOUT_MINUTES: i64 = 30;

/// Classifies decoded admin sessions.
#[derive(Clone)]
pub struct SessionValidator {
    signer: SessionSigner,
    idle_timeout: Duration,
    session_lifetime: Duration,
}

impl SessionValidator {
    /// Creates a new `SessionValidator`.
    ///
    /// # Arguments
    ///
    /// * `signer` - Verifies auth tokens.
    /// * `idle_timeout` - How long a session may go without activity.
    /// * `session_lifetime` - How long an auth token stays valid after issue,
    ///   whatever the activity.
    pub fn new(signer: SessionSigner, idle_timeout: Duration, session_lifetime: Duration) -> Self {
        Self {
            signer,
            idle_timeout,
            session_lifetime,
        }
    }

    /// The configured idle timeout.
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Classifies `session` as of `now`.
    ///
    /// A session is expired only when `now - last_active_at` is strictly
    /// greater than the idle timeout; exactly at the timeout it is still active.
    /// A session with a valid token but no activity timestamp is active. A
    /// token older than the session lifetime is not valid.
    pub fn classify(&self, session: &Session, now: DateTime<Utc>) -> SessionState {
        let Some(auth_token) = &session.auth_token else {
            return SessionState::NotAuthenticated;
        };

        if !token::verify_token(&self.signer, auth_token, now, self.session_lifetime) {
            tracing::warn!("❌ Admin auth token failed validation");
            return SessionState::NotAuthenticated;
        }

        match session.last_active_at {
            Some(last_active_at) if now.signed_duration_since(last_active_at) > self.idle_timeout => {
                tracing::info!(
                    "⏰ Admin session idle since {} (timeout {} min)",
                    last_active_at,
                    self.idle_timeout.num_minutes()
                );
                SessionState::Expired
            }
            _ => SessionState::Active,
        }
    }
}
