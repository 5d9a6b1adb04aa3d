use std::fmt;

use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};

/// The opaque admin auth token, exactly as carried by its cookie.
///
/// Holding one proves nothing on its own; it has to pass
/// [`verify_token`](crate::crypto::token::verify_token).
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a raw cookie value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw cookie value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(..)")
    }
}

/// Admin roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Staff,
}

/// The admin identity shown in the dashboard.
///
/// Display data only. Authorization always comes from the auth token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Identity {
    #[garde(length(min = 1, max = 64), custom(crate::validation::identity::username_charset))]
    pub username: String,
    #[garde(skip)]
    pub role: Role,
}

impl Identity {
    /// The identity reported when a session carries no identity cookie.
    pub fn owner() -> Self {
        Self {
            username: "owner".to_string(),
            role: Role::Owner,
        }
    }
}

/// The decoded admin cookies of a single request.
///
/// Every field is independently optional: a missing or malformed cookie is
/// simply `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// The auth token, if the cookie was present and well-formed.
    pub auth_token: Option<AuthToken>,
    /// The advisory identity.
    pub identity: Option<Identity>,
    /// When admin activity was last recorded.
    pub last_active_at: Option<DateTime<Utc>>,
}

/// How a request's admin session classifies at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No valid auth token.
    NotAuthenticated,
    /// Valid token, within the idle timeout.
    Active,
    /// Valid token, idle for longer than the timeout.
    Expired,
}

impl SessionState {
    /// Whether the state grants admin access.
    pub fn is_active(self) -> bool {
        self == SessionState::Active
    }
}
