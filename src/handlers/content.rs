use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use garde::Validate;
use serde::Serialize;

use crate::{
    error::{AppError, Result},
    handlers::admin::SuccessResponse,
    middleware_layer::auth::AdminGate,
    models::content::{Booking, SiteSettings},
    state::AppState,
};

/// The data file holding bookings.
pub const BOOKINGS_FILE: &str = "bookings.json";
/// The data file holding site settings.
pub const SETTINGS_FILE: &str = "settings.json";

/// The response payload for the bookings list.
#[derive(Serialize)]
pub struct BookingsResponse {
    pub bookings: Vec<Booking>,
}

/// The response payload for site settings.
#[derive(Serialize)]
pub struct SettingsResponse {
    pub settings: SiteSettings,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

fn fallback_error(status: StatusCode, error: &'static str) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

/// Lists bookings, soonest first.
///
/// A data-store failure yields an empty list rather than an error.
#[axum::debug_handler(state = AppState)]
pub async fn list_bookings(State(state): State<AppState>, gate: AdminGate) -> Result<Response> {
    gate.require_admin_auth()?;

    let mut bookings = match state
        .data
        .read_data_file::<Vec<Booking>>(BOOKINGS_FILE, Vec::new())
        .await
    {
        Ok(bookings) => bookings,
        Err(e) => {
            tracing::error!("❌ Failed to load bookings: {}", e);
            Vec::new()
        }
    };

    bookings.sort_by_key(|booking| booking.starts_at);

    Ok((StatusCode::OK, Json(BookingsResponse { bookings })).into_response())
}

/// Returns the site settings.
#[axum::debug_handler(state = AppState)]
pub async fn get_settings(State(state): State<AppState>, gate: AdminGate) -> Result<Response> {
    gate.require_admin_auth()?;

    match state
        .data
        .read_data_file(SETTINGS_FILE, SiteSettings::default())
        .await
    {
        Ok(settings) => Ok((StatusCode::OK, Json(SettingsResponse { settings })).into_response()),
        Err(e) => {
            tracing::error!("❌ Failed to load settings: {}", e);
            Ok(fallback_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load settings",
            ))
        }
    }
}

/// Replaces the site settings.
#[axum::debug_handler(state = AppState)]
pub async fn update_settings(
    State(state): State<AppState>,
    gate: AdminGate,
    Json(settings): Json<SiteSettings>,
) -> Result<Response> {
    gate.require_admin_auth()?;

    settings
        .validate()
        .map_err(|report| AppError::Validation(report.to_string()))?;

    if let Err(e) = state.data.write_data_file(SETTINGS_FILE, &settings).await {
        tracing::error!("❌ Failed to save settings: {}", e);
        return Ok(fallback_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to save settings",
        ));
    }

    tracing::info!("✅ Settings updated by {}", gate.admin_user().username);

    Ok((StatusCode::OK, Json(SuccessResponse { success: true })).into_response())
}
