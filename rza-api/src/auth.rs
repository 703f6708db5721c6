use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rza_core::booking::Booking;
use rza_core::user::NewUser;
use rza_store::StoreError;

use crate::error::AppError;
use crate::middleware::session::{require_session, session_cookie, SessionUser};
use crate::password;
use crate::state::AppState;
use crate::token::{self, SESSION_COOKIE};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub bookings: Vec<Booking>,
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me))
        .route_layer(axum::middleware::from_fn_with_state(state, require_session))
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin))
        .route("/auth/signout", post(signout))
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::ValidationError(format!("missing required field: {field}")))
}

async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<MessageResponse>), AppError> {
    let full_name = required(req.full_name, "fullName")?;
    let email = required(req.email, "email")?;
    let plain_password = required(req.password, "password")?;

    let password_hash = password::hash_password(&plain_password)?;

    // The unique index on email decides, not a pre-check.
    let user = state
        .users
        .create(&NewUser {
            full_name,
            email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            StoreError::Duplicate => AppError::DuplicateEmail,
            other => AppError::InternalServerError(other.to_string()),
        })?;

    tracing::info!(user_id = %user.id, "user signed up");

    let token = token::issue(user.id, &state.auth)
        .map_err(|e| AppError::InternalServerError(format!("token encoding failed: {e}")))?;
    let jar = jar.add(session_cookie(token, &state.auth));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(MessageResponse {
            message: "User created successfully",
        }),
    ))
}

async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<SigninRequest>,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    let email = required(req.email, "email")?;
    let plain_password = required(req.password, "password")?;

    let user = state
        .users
        .find_by_email(&email)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or(AppError::InvalidCredentials)?;

    if !password::verify_password(&plain_password, &user.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let token = token::issue(user.id, &state.auth)
        .map_err(|e| AppError::InternalServerError(format!("token encoding failed: {e}")))?;
    let jar = jar.add(session_cookie(token, &state.auth));

    Ok((
        jar,
        Json(MessageResponse {
            message: "Signed in successfully",
        }),
    ))
}

async fn signout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));

    (
        jar,
        Json(MessageResponse {
            message: "Signed out successfully",
        }),
    )
}

async fn me(
    State(state): State<AppState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
) -> Result<Json<MeResponse>, AppError> {
    let user = state
        .users
        .find_by_id(user_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError("User not found".to_string()))?;

    let bookings = state
        .bookings
        .list_for_user(user.id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(MeResponse {
        id: user.id,
        full_name: user.full_name,
        email: user.email,
        bookings,
    }))
}
