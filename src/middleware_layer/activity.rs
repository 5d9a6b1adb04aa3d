use axum::{
    body::Body,
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tower_cookies::Cookies;

use crate::{
    middleware_layer::auth::AdminGate,
    session::{codec::apply_directives, mutator},
    state::AppState,
};

fn is_safe_method(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD || method == Method::OPTIONS
}

/// A middleware that refreshes the last-active cookie after admin activity.
///
/// Only successful responses to non-safe methods from an active session count
/// as activity. Must run inside [`require_admin`](crate::middleware_layer::auth::require_admin).
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `req` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// The inner response, with the refreshed cookie when activity was recorded.
pub async fn track_activity(
    State(state): State<AppState>,
    cookies: Cookies,
    req: Request<Body>,
    next: Next,
) -> Response {
    if is_safe_method(req.method()) {
        return next.run(req).await;
    }

    let gate = match req.extensions().get::<AdminGate>() {
        Some(gate) => gate.clone(),
        None => AdminGate::evaluate(&state, &cookies, Utc::now()),
    };

    let response = next.run(req).await;

    if !response.status().is_success() || !gate.is_admin_authenticated() {
        return response;
    }

    apply_directives(&cookies, mutator::touch(&state.codec, gate.session(), Utc::now()));

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_mutating_methods_count_as_activity() {
        assert!(is_safe_method(&Method::GET));
        assert!(is_safe_method(&Method::HEAD));
        assert!(is_safe_method(&Method::OPTIONS));
        assert!(!is_safe_method(&Method::POST));
        assert!(!is_safe_method(&Method::PUT));
        assert!(!is_safe_method(&Method::DELETE));
    }
}
