use std::sync::Arc;

use rza_core::catalog::TicketCatalog;
use rza_mailer::Mailer;
use rza_store::{BookingRepository, UserRepository};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub session_days: i64,
    pub cookie_secure: bool,
}

/// Shared read-only handles, built once at startup and cloned into each
/// request handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserRepository>,
    pub bookings: Arc<BookingRepository>,
    pub mailer: Arc<Mailer>,
    pub catalog: Arc<TicketCatalog>,
    pub auth: AuthConfig,
}
