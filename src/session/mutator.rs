//! Computes the cookie changes for login, activity and logout.
//!
//! Nothing here touches server-side state; each operation returns the
//! directives to attach to the outgoing response.

use chrono::{DateTime, Utc};

use crate::crypto::token::issue_token;
use crate::models::session::{Identity, Session};
use crate::session::codec::{CookieCodec, CookieDirective};

/// Starts a new admin session for `identity`.
///
/// Issues a fresh auth token and sets all three cookies together.
pub fn establish(codec: &CookieCodec, identity: Identity, now: DateTime<Utc>) -> Vec<CookieDirective> {
    let session = Session {
        auth_token: Some(issue_token(codec.signer(), now)),
        identity: Some(identity),
        last_active_at: Some(now),
    };

    tracing::info!("✅ Admin session established");
    codec.encode(&session)
}

/// Records admin activity on an existing session.
///
/// Only the last-active cookie is reissued. The timestamp never moves
/// backwards, so repeated calls with the same or an earlier `now` are no-ops.
pub fn touch(codec: &CookieCodec, session: &Session, now: DateTime<Utc>) -> Vec<CookieDirective> {
    let at = match session.last_active_at {
        Some(previous) if previous > now => previous,
        _ => now,
    };

    tracing::debug!("🔄 Admin activity recorded at {}", at);
    vec![codec.encode_last_active(at)]
}

/// Ends the admin session, whatever state it is in.
pub fn revoke(codec: &CookieCodec) -> Vec<CookieDirective> {
    codec.clear_all()
}
