use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::{AppState, AuthConfig};
use crate::token::{self, SESSION_COOKIE};

/// Verified identity of the current request, injected by `require_session`.
#[derive(Debug, Clone, Copy)]
pub struct SessionUser(pub Uuid);

/// Resolves the optional session cookie to a verified user id.
///
/// Missing cookie, malformed token, bad signature, and expiry all
/// downgrade to anonymous here; endpoints that require a user go through
/// `require_session` instead.
pub fn resolve_identity(jar: &CookieJar, auth: &AuthConfig) -> Option<Uuid> {
    let cookie = jar.get(SESSION_COOKIE)?;
    token::verify(cookie.value(), &auth.secret)
}

/// Gate for endpoints that only make sense signed in. An absent or
/// invalid credential is a 401, distinct from 404.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = resolve_identity(&jar, &state.auth).ok_or(AppError::NotAuthenticated)?;

    req.extensions_mut().insert(SessionUser(user_id));

    Ok(next.run(req).await)
}

/// Builds the HTTP-only session cookie around a freshly issued token.
pub fn session_cookie(token: String, auth: &AuthConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(auth.cookie_secure)
        .max_age(time::Duration::days(auth.session_days))
        .build()
}
