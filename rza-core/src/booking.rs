use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// Normalized ticket selection. Raw submissions arrive either as a JSON
/// object or a JSON-encoded string; the validator folds both forms into
/// this single representation before anything downstream sees them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSelection {
    /// Flat-rate category id -> quantity.
    pub quantities: BTreeMap<String, u32>,
    /// Group-rate party, priced per student/teacher rather than per ticket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupParty>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupParty {
    pub students: u32,
    pub teachers: u32,
}

/// One persisted visit reservation. Immutable once created.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub visit_date: NaiveDate,
    pub tickets: TicketSelection,
    #[serde(rename = "total", serialize_with = "pence_as_pounds")]
    pub total_pence: i32,
    pub card_last_four: String,
    pub email: String,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A validated booking-creation request, ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub visit_date: NaiveDate,
    pub tickets: TicketSelection,
    pub total_pence: i32,
    pub card_last_four: String,
    pub email: String,
}

/// Raw checkout payload as submitted by the client. Every field is
/// optional here so the validator can name the first one that is missing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSubmission {
    pub selected_date: Option<String>,
    pub tickets: Option<serde_json::Value>,
    pub total: Option<serde_json::Value>,
    pub payment_info: Option<PaymentInfo>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub card_last_four: Option<String>,
}

/// Serializes integer pence as a two-decimal pound amount.
pub fn pence_as_pounds<S: Serializer>(pence: &i32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(f64::from(*pence) / 100.0)
}
