use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_cookies::CookieManagerLayer;
use tower_http::services::ServeDir;

use crate::{handlers, middleware_layer, state::AppState};

/// Builds the application router.
///
/// The current-user probe and logout are open; every other admin route sits
/// behind `require_admin`, with `track_activity` refreshing the session after
/// mutating requests. Handlers in that group that extract an `AdminGate` get
/// the one `require_admin` stored. Anything unmatched is served from the
/// public directory.
pub fn build_router(state: AppState) -> Router {
    let session_routes = Router::new()
        .route("/api/admin/current-user", get(handlers::admin::current_user))
        .route("/api/admin/logout", post(handlers::admin::logout))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route(
            "/api/admin/session/heartbeat",
            post(handlers::admin::heartbeat),
        )
        .route("/api/admin/bookings", get(handlers::content::list_bookings))
        .route(
            "/api/admin/settings",
            get(handlers::content::get_settings).put(handlers::content::update_settings),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::activity::track_activity,
        ))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_admin,
        ))
        .with_state(state.clone());

    Router::new()
        .merge(session_routes)
        .merge(admin_routes)
        .layer(CookieManagerLayer::new())
        .fallback_service(ServeDir::new(&state.config.public_dir))
}
