use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    /// A protected endpoint was called without a valid session.
    NotAuthenticated,
    /// Signin failed. Deliberately covers both unknown email and wrong
    /// password so the response cannot be used to enumerate accounts.
    InvalidCredentials,
    ValidationError(String),
    NotFoundError(String),
    DuplicateEmail,
    DuplicateBooking,
    /// Confirmation email could not be sent. Reported distinctly so the
    /// client can still treat the booking itself as successful.
    EmailFailed(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                "NOT_AUTHENTICATED",
                "Not authenticated".to_string(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid email or password".to_string(),
            ),
            AppError::ValidationError(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::DuplicateEmail => (
                StatusCode::CONFLICT,
                "DUPLICATE_EMAIL",
                "An account with this email already exists".to_string(),
            ),
            AppError::DuplicateBooking => (
                StatusCode::CONFLICT,
                "DUPLICATE_BOOKING",
                "A booking already exists for this email and date".to_string(),
            ),
            AppError::EmailFailed(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "EMAIL_FAILED", msg.clone())
            }
            AppError::InternalServerError(_) | AppError::Anyhow(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal Server Error".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
            }
            AppError::EmailFailed(msg) => {
                tracing::error!("Confirmation email failure: {}", msg);
            }
            _ => {}
        }

        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Anyhow(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            AppError::NotAuthenticated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::ValidationError("missing required field: email".into())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::DuplicateBooking.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::NotFoundError("User not found".into())
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn internal_detail_is_not_leaked() {
        let (_, _, message) =
            AppError::InternalServerError("pool timed out connecting to pg".into()).parts();
        assert_eq!(message, "Internal Server Error");
    }

    #[test]
    fn credential_errors_share_one_shape() {
        // Unknown email and wrong password both map to this exact variant,
        // so the serialized body is identical for either cause.
        let (status, code, message) = AppError::InvalidCredentials.parts();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(code, "INVALID_CREDENTIALS");
        assert_eq!(message, "Invalid email or password");
    }
}
