use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use tracing::{info, warn};

use rza_core::booking::{Booking, BookingSubmission};
use rza_core::validate::validate_submission;
use rza_store::StoreError;

use crate::error::AppError;
use crate::middleware::session::{require_session, resolve_identity, SessionUser};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    pub success: bool,
    pub booking: Booking,
    /// Whether the confirmation email went out. The booking is durable
    /// either way.
    pub email_sent: bool,
}

#[derive(Debug, Serialize)]
pub struct BookingsResponse {
    pub bookings: Vec<Booking>,
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/bookings/mine", get(mine))
        .route_layer(axum::middleware::from_fn_with_state(state, require_session))
        .route("/bookings", post(create_booking))
}

async fn create_booking(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(raw): Json<BookingSubmission>,
) -> Result<Json<CreateBookingResponse>, AppError> {
    // An absent or invalid session just means an anonymous booking keyed
    // by email; it never rejects the request here.
    let owner = resolve_identity(&jar, &state.auth);

    let request =
        validate_submission(raw).map_err(|e| AppError::ValidationError(e.to_string()))?;

    let booking = state
        .bookings
        .create(&request, owner)
        .await
        .map_err(|e| match e {
            StoreError::Duplicate => AppError::DuplicateBooking,
            other => AppError::InternalServerError(other.to_string()),
        })?;

    info!(booking_id = %booking.id, visit_date = %booking.visit_date, "booking created");

    // Best-effort from here on: the booking is already durable and a
    // failed send must not unwind it or fail the response.
    let email_sent = match state
        .mailer
        .send_booking_confirmation(&request, &state.catalog)
        .await
    {
        Ok(_) => true,
        Err(e) => {
            warn!(booking_id = %booking.id, "confirmation email failed: {e}");
            false
        }
    };

    Ok(Json(CreateBookingResponse {
        success: true,
        booking,
        email_sent,
    }))
}

async fn mine(
    State(state): State<AppState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
) -> Result<Json<BookingsResponse>, AppError> {
    let bookings = state
        .bookings
        .list_for_user(user_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(BookingsResponse { bookings }))
}
