use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tower_cookies::Cookies;

use crate::{
    middleware_layer::auth::AdminGate,
    models::session::Identity,
    session::{codec::apply_directives, mutator},
    state::AppState,
};

/// The response payload for the current-user probe.
#[derive(Serialize)]
pub struct CurrentUserResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Identity>,
}

/// The response payload for session actions.
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// The response payload for a heartbeat.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatResponse {
    pub success: bool,
    pub idle_timeout_seconds: i64,
}

/// Reports whether the caller is an authenticated admin, and who.
#[axum::debug_handler(state = AppState)]
pub async fn current_user(gate: AdminGate) -> Response {
    if !gate.is_admin_authenticated() {
        tracing::debug!("👤 Current user probe: {:?}", gate.state());
        let response = CurrentUserResponse {
            authenticated: false,
            user: None,
        };
        return (StatusCode::UNAUTHORIZED, Json(response)).into_response();
    }

    let response = CurrentUserResponse {
        authenticated: true,
        user: Some(gate.admin_user()),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// Handles admin logout.
///
/// Clears every session cookie, whatever state the session is in.
#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Response {
    apply_directives(&cookies, mutator::revoke(&state.codec));

    tracing::info!("👋 Admin session cookies cleared");

    (StatusCode::OK, Json(SuccessResponse { success: true })).into_response()
}

/// Keeps an admin session alive.
///
/// Runs behind `require_admin`; the refresh itself is done by `track_activity`.
#[axum::debug_handler]
pub async fn heartbeat(State(state): State<AppState>) -> Response {
    let response = HeartbeatResponse {
        success: true,
        idle_timeout_seconds: state.validator.idle_timeout().num_seconds(),
    };

    (StatusCode::OK, Json(response)).into_response()
}
