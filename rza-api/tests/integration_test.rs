use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use rza_api::state::{AppState, AuthConfig};
use rza_api::app;
use rza_core::catalog::TicketCatalog;
use rza_mailer::{Mailer, MailerConfig};
use rza_store::{BookingRepository, DbClient, UserRepository};

// These tests drive the real router against a real database. They are
// skipped unless DATABASE_URL points at a disposable Postgres instance.
async fn test_state() -> Option<AppState> {
    let url = std::env::var("DATABASE_URL").ok()?;

    let db = DbClient::new(&url).await.expect("connect to test database");
    db.migrate().await.expect("run migrations");

    // Deliberately unconfigured: booking creation must still succeed when
    // the confirmation email cannot be sent.
    let mailer = Mailer::new(MailerConfig {
        host: "smtp.invalid".to_string(),
        port: 587,
        username: String::new(),
        password: String::new(),
        from_name: "RZA Zoo".to_string(),
        from_address: "noreply@rza.invalid".to_string(),
    });

    Some(AppState {
        users: Arc::new(UserRepository::new(db.pool.clone())),
        bookings: Arc::new(BookingRepository::new(db.pool.clone())),
        mailer: Arc::new(mailer),
        catalog: Arc::new(TicketCatalog::standard()),
        auth: AuthConfig {
            secret: "integration-test-secret".to_string(),
            session_days: 7,
            cookie_secure: false,
        },
    })
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn session_cookie_from(response: &axum::response::Response) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie set")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("rza_session="));
    set_cookie.split(';').next().unwrap().to_string()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn booking_payload(email: &str, date: &str) -> Value {
    json!({
        "selectedDate": date,
        "tickets": {"adult": 2, "family": 1},
        "total": 47.97,
        "paymentInfo": {"cardLastFour": "4242"},
        "email": email,
    })
}

#[tokio::test]
async fn signup_me_booking_flow() {
    let Some(state) = test_state().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let app = app(state);

    let email = format!("visitor-{}@example.com", Uuid::new_v4());

    // signup issues a session cookie
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/signup",
            json!({"fullName": "Test Visitor", "email": email, "password": "hunter2"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = session_cookie_from(&response);

    // a fresh account has no bookings
    let response = app
        .clone()
        .oneshot(get_with_cookie("/auth/me", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let me = json_body(response).await;
    assert_eq!(me["email"], email.as_str());
    assert_eq!(me["bookings"], json!([]));

    // booking succeeds even though the mailer is unconfigured
    let mut request = post_json("/bookings", booking_payload(&email, "2031-06-14T00:00:00.000Z"));
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = json_body(response).await;
    assert_eq!(created["success"], json!(true));
    assert_eq!(created["emailSent"], json!(false));
    assert_eq!(created["booking"]["total"], json!(47.97));

    // and shows up in the owner's history, ascending by date
    let response = app
        .clone()
        .oneshot(get_with_cookie("/bookings/mine", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let mine = json_body(response).await;
    assert_eq!(mine["bookings"].as_array().unwrap().len(), 1);
    assert_eq!(mine["bookings"][0]["visitDate"], json!("2031-06-14"));

    // a second booking for the same identity and date conflicts
    let mut request = post_json("/bookings", booking_payload(&email, "2031-06-14T00:00:00.000Z"));
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let conflict = json_body(response).await;
    assert_eq!(conflict["error"], json!("DUPLICATE_BOOKING"));
}

#[tokio::test]
async fn concurrent_duplicate_bookings_yield_one_row() {
    let Some(state) = test_state().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let app = app(state);

    let email = format!("race-{}@example.com", Uuid::new_v4());
    let payload = booking_payload(&email, "2031-07-01");

    let (left, right) = tokio::join!(
        app.clone().oneshot(post_json("/bookings", payload.clone())),
        app.clone().oneshot(post_json("/bookings", payload.clone())),
    );

    let mut statuses = [left.unwrap().status(), right.unwrap().status()];
    statuses.sort();

    // exactly one success and one conflict, in either arrival order
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);
}

#[tokio::test]
async fn signin_does_not_leak_which_credential_was_wrong() {
    let Some(state) = test_state().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let app = app(state);

    let email = format!("enum-{}@example.com", Uuid::new_v4());
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/signup",
            json!({"fullName": "Enum Probe", "email": email, "password": "correct horse"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let wrong_password = app
        .clone()
        .oneshot(post_json(
            "/auth/signin",
            json!({"email": email, "password": "battery staple"}),
        ))
        .await
        .unwrap();
    let unknown_email = app
        .clone()
        .oneshot(post_json(
            "/auth/signin",
            json!({"email": "nobody@example.com", "password": "battery staple"}),
        ))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(wrong_password).await,
        json_body(unknown_email).await
    );
}

#[tokio::test]
async fn protected_endpoints_reject_anonymous_requests() {
    let Some(state) = test_state().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let app = app(state);

    for uri in ["/auth/me", "/bookings/mine"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");

        let body = json_body(response).await;
        assert_eq!(body["error"], json!("NOT_AUTHENTICATED"));
    }
}

#[tokio::test]
async fn malformed_submissions_fail_before_storage() {
    let Some(state) = test_state().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let app = app(state);

    let mut payload = booking_payload("whoever@example.com", "2031-08-01");
    payload.as_object_mut().unwrap().remove("email");

    let response = app
        .clone()
        .oneshot(post_json("/bookings", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"], json!("VALIDATION_ERROR"));
    assert!(body["message"].as_str().unwrap().contains("email"));
}
