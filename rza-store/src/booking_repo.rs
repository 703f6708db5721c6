use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use rza_core::booking::{Booking, NewBooking, TicketSelection};

use crate::error::StoreError;

pub struct BookingRepository {
    pool: PgPool,
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    visit_date: NaiveDate,
    ticket_details: Value,
    total_pence: i32,
    card_last_four: String,
    email: String,
    user_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_booking(self) -> Result<Booking, StoreError> {
        let tickets: TicketSelection = serde_json::from_value(self.ticket_details)?;

        Ok(Booking {
            id: self.id,
            visit_date: self.visit_date,
            tickets,
            total_pence: self.total_pence,
            card_last_four: self.card_last_four,
            email: self.email,
            user_id: self.user_id,
            created_at: self.created_at,
        })
    }
}

const BOOKING_COLUMNS: &str =
    "id, visit_date, ticket_details, total_pence, card_last_four, email, user_id, created_at";

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persists one booking with the resolved identity as owner.
    ///
    /// Duplicate (identity, visit date) pairs are rejected by the unique
    /// indexes inside the insert itself rather than a pre-check, so two
    /// concurrent submissions can never both succeed.
    pub async fn create(
        &self,
        request: &NewBooking,
        owner: Option<Uuid>,
    ) -> Result<Booking, StoreError> {
        let ticket_details = serde_json::to_value(&request.tickets)?;

        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            INSERT INTO bookings (id, visit_date, ticket_details, total_pence, card_last_four, email, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(request.visit_date)
        .bind(ticket_details)
        .bind(request.total_pence)
        .bind(&request.card_last_four)
        .bind(&request.email)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        row.into_booking()
    }

    /// All bookings owned by a user, ascending by visit date.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, StoreError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY visit_date ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BookingRow::into_booking).collect()
    }
}
