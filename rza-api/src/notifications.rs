use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use rza_core::booking::BookingSubmission;
use rza_core::validate::validate_submission;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationResponse {
    pub success: bool,
    pub message_id: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/notifications/booking-confirmation",
        post(booking_confirmation),
    )
}

/// Client-driven resend of a booking confirmation. Creation already
/// triggers one server-side; this endpoint revalidates the payload and
/// sends another copy.
async fn booking_confirmation(
    State(state): State<AppState>,
    Json(raw): Json<BookingSubmission>,
) -> Result<Json<ConfirmationResponse>, AppError> {
    let details =
        validate_submission(raw).map_err(|e| AppError::ValidationError(e.to_string()))?;

    let message_id = state
        .mailer
        .send_booking_confirmation(&details, &state.catalog)
        .await
        .map_err(|e| AppError::EmailFailed(e.to_string()))?;

    Ok(Json(ConfirmationResponse {
        success: true,
        message_id,
    }))
}
