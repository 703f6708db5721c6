use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AuthConfig;

/// Name of the HTTP-only cookie carrying the session credential.
pub const SESSION_COOKIE: &str = "rza_session";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Issues a signed session credential embedding the user id, expiring
/// `auth.session_days` from now.
pub fn issue(user_id: Uuid, auth: &AuthConfig) -> Result<String, jsonwebtoken::errors::Error> {
    issue_at(user_id, auth, Utc::now())
}

pub fn issue_at(
    user_id: Uuid,
    auth: &AuthConfig,
    now: DateTime<Utc>,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + Duration::days(auth.session_days)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.secret.as_bytes()),
    )
}

/// Pure check: returns the embedded identity iff the signature is valid
/// and the credential has not expired.
pub fn verify(token: &str, secret: &str) -> Option<Uuid> {
    verify_at(token, secret, Utc::now())
}

/// Expiry is checked against the supplied clock rather than the decoder's
/// so it can be tested without sleeping.
pub fn verify_at(token: &str, secret: &str, now: DateTime<Utc>) -> Option<Uuid> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .ok()?;

    if data.claims.exp as i64 <= now.timestamp() {
        return None;
    }

    Uuid::parse_str(&data.claims.sub).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AuthConfig {
        AuthConfig {
            secret: "test-secret".to_string(),
            session_days: 7,
            cookie_secure: false,
        }
    }

    #[test]
    fn accepted_within_the_session_window() {
        let auth = auth();
        let user_id = Uuid::new_v4();
        let issued = Utc::now();
        let token = issue_at(user_id, &auth, issued).unwrap();

        let six_days_on = issued + Duration::days(6);
        assert_eq!(verify_at(&token, &auth.secret, six_days_on), Some(user_id));
    }

    #[test]
    fn rejected_after_expiry() {
        let auth = auth();
        let issued = Utc::now();
        let token = issue_at(Uuid::new_v4(), &auth, issued).unwrap();

        let eight_days_on = issued + Duration::days(8);
        assert_eq!(verify_at(&token, &auth.secret, eight_days_on), None);
    }

    #[test]
    fn rejected_under_a_different_key() {
        let auth = auth();
        let token = issue_at(Uuid::new_v4(), &auth, Utc::now()).unwrap();

        assert_eq!(verify(&token, "some-other-secret"), None);
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        assert_eq!(verify("not-a-jwt", "test-secret"), None);
        assert_eq!(verify("", "test-secret"), None);
    }
}
