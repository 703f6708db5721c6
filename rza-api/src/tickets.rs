use axum::{extract::State, routing::get, Json, Router};

use rza_core::catalog::TicketCatalog;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/tickets", get(list_tickets))
}

/// The static ticket catalog, as the booking UI renders it.
async fn list_tickets(State(state): State<AppState>) -> Json<TicketCatalog> {
    Json(state.catalog.as_ref().clone())
}
