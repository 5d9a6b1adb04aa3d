use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use tower_cookies::Cookies;

use crate::{
    error::{AppError, Result},
    models::session::{Identity, Session, SessionState},
    session::codec::request_jar,
    session::validator::SessionValidator,
    state::AppState,
};

/// Returns the identity to display for a session.
///
/// The stored identity is used only for an active session that carries one;
/// everything else gets the default owner identity. This is display data and
/// grants nothing: callers gate access separately.
pub fn get_admin_user(session: &Session, state: SessionState) -> Identity {
    match (&session.identity, state) {
        (Some(identity), SessionState::Active) => identity.clone(),
        _ => Identity::owner(),
    }
}

/// The admin authentication decision for one request.
///
/// Usable as an extractor; extraction never fails, and anything that goes
/// wrong while reading cookies leaves the gate closed.
#[derive(Debug, Clone)]
pub struct AdminGate {
    session: Session,
    state: SessionState,
}

impl AdminGate {
    /// Classifies an already decoded session.
    pub fn from_session(validator: &SessionValidator, session: Session, now: DateTime<Utc>) -> Self {
        let state = validator.classify(&session, now);
        Self { session, state }
    }

    /// Decodes and classifies the admin session carried by `cookies`.
    pub fn evaluate(app: &AppState, cookies: &Cookies, now: DateTime<Utc>) -> Self {
        let session = app.codec.decode(&request_jar(cookies));
        Self::from_session(&app.validator, session, now)
    }

    /// A gate that admits nobody.
    pub fn closed() -> Self {
        Self {
            session: Session::default(),
            state: SessionState::NotAuthenticated,
        }
    }

    /// The decoded session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The session's classification.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the request comes from an authenticated admin.
    pub fn is_admin_authenticated(&self) -> bool {
        self.state.is_active()
    }

    /// Fails with [`AppError::Unauthorized`] unless the request comes from an
    /// authenticated admin.
    pub fn require_admin_auth(&self) -> Result<()> {
        if self.is_admin_authenticated() {
            Ok(())
        } else {
            Err(AppError::Unauthorized)
        }
    }

    /// The identity to display. Does not check authentication.
    pub fn admin_user(&self) -> Identity {
        get_admin_user(&self.session, self.state)
    }
}

impl FromRequestParts<AppState> for AdminGate {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        if let Some(gate) = parts.extensions.get::<AdminGate>() {
            return Ok(gate.clone());
        }

        let gate = match Cookies::from_request_parts(parts, state).await {
            Ok(cookies) => AdminGate::evaluate(state, &cookies, Utc::now()),
            Err((status, message)) => {
                tracing::error!("❌ Cookie jar unavailable ({}): {}", status, message);
                AdminGate::closed()
            }
        };

        Ok(gate)
    }
}

/// A middleware that requires an authenticated admin.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// The inner response, or `401 {"error":"Unauthorized"}`.
pub async fn require_admin(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    tracing::debug!("🔐 Checking admin authentication...");

    let gate = AdminGate::evaluate(&state, &cookies, Utc::now());
    if let Err(e) = gate.require_admin_auth() {
        tracing::warn!(
            "❌ Admin request rejected ({:?}): {} {}",
            gate.state(),
            request.method(),
            request.uri().path()
        );
        return e.into_response();
    }

    tracing::debug!("✅ Admin authenticated");

    request.extensions_mut().insert(gate);

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::crypto::signing::SessionSigner;
    use crate::crypto::token::issue_token;
    use crate::models::session::{AuthToken, Role};

    fn signer() -> SessionSigner {
        SessionSigner::new(&[4u8; 32]).unwrap()
    }

    fn validator() -> SessionValidator {
        SessionValidator::new(signer(), Duration::minutes(30), Duration::days(7))
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_760_000_000, 0).unwrap()
    }

    fn jane() -> Identity {
        Identity {
            username: "jane".to_string(),
            role: Role::Staff,
        }
    }

    fn sessions() -> Vec<Session> {
        let token = issue_token(&signer(), now());
        vec![
            Session::default(),
            Session {
                identity: Some(jane()),
                last_active_at: Some(now()),
                ..Session::default()
            },
            Session {
                auth_token: Some(AuthToken::new("garbage")),
                ..Session::default()
            },
            Session {
                auth_token: Some(token.clone()),
                ..Session::default()
            },
            Session {
                auth_token: Some(token.clone()),
                identity: Some(jane()),
                last_active_at: Some(now()),
            },
            Session {
                auth_token: Some(token),
                identity: Some(jane()),
                last_active_at: Some(now() - Duration::hours(2)),
            },
        ]
    }

    #[test]
    fn require_agrees_with_probe() {
        let validator = validator();
        for session in sessions() {
            let gate = AdminGate::from_session(&validator, session, now());
            assert_eq!(gate.require_admin_auth().is_ok(), gate.is_admin_authenticated());
            if let Err(e) = gate.require_admin_auth() {
                assert!(e.is_unauthorized());
            }
        }
    }

    #[test]
    fn closed_gate_admits_nobody() {
        let gate = AdminGate::closed();
        assert!(!gate.is_admin_authenticated());
        assert_eq!(gate.admin_user(), Identity::owner());
    }

    #[test]
    fn expired_session_is_not_authenticated() {
        let validator = validator();
        let session = sessions().pop().unwrap();
        let gate = AdminGate::from_session(&validator, session, now());
        assert_eq!(gate.state(), SessionState::Expired);
        assert!(!gate.is_admin_authenticated());
    }

    #[test]
    fn admin_user_falls_back_to_owner() {
        let session = Session {
            auth_token: Some(AuthToken::new("whatever")),
            identity: None,
            last_active_at: None,
        };
        assert_eq!(get_admin_user(&session, SessionState::Active), Identity::owner());
    }

    #[test]
    fn admin_user_returns_identity_only_when_active() {
        let session = Session {
            identity: Some(jane()),
            ..Session::default()
        };
        assert_eq!(get_admin_user(&session, SessionState::Active), jane());
        assert_eq!(get_admin_user(&session, SessionState::Expired), Identity::owner());
        assert_eq!(get_admin_user(&session, SessionState::NotAuthenticated), Identity::owner());
    }
}
