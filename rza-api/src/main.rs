use std::net::SocketAddr;
use std::sync::Arc;

use rza_api::state::{AppState, AuthConfig};
use rza_api::app;
use rza_core::catalog::TicketCatalog;
use rza_mailer::{Mailer, MailerConfig};
use rza_store::{BookingRepository, DbClient, UserRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rza_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = rza_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting RZA booking API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let mailer = Mailer::new(MailerConfig {
        host: config.smtp.host.clone(),
        port: config.smtp.port,
        username: config.smtp.username.clone(),
        password: config.smtp.password.clone(),
        from_name: config.smtp.from_name.clone(),
        from_address: config.smtp.from_address.clone(),
    });

    if mailer.is_configured() {
        match mailer.verify().await {
            Ok(true) => tracing::info!("SMTP relay is ready to take our messages"),
            Ok(false) => tracing::warn!("SMTP relay refused the connection test"),
            Err(e) => tracing::warn!("SMTP connection check failed: {e}"),
        }
    } else {
        tracing::warn!("SMTP credentials not configured; confirmation emails will fail");
    }

    let app_state = AppState {
        users: Arc::new(UserRepository::new(db.pool.clone())),
        bookings: Arc::new(BookingRepository::new(db.pool.clone())),
        mailer: Arc::new(mailer),
        catalog: Arc::new(TicketCatalog::standard()),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            session_days: config.auth.session_days,
            cookie_secure: config.auth.cookie_secure,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
