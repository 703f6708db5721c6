use serde::Serialize;

use crate::booking::pence_as_pounds;

/// Category id the group party rides under in a ticket selection.
pub const GROUP_TICKET_ID: &str = "group";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketKind {
    /// Priced as unit price x quantity.
    Flat,
    /// Priced per student/teacher, not per ticket.
    Group,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketType {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "price", serialize_with = "pence_as_pounds")]
    pub price_pence: i32,
    pub kind: TicketKind,
}

/// The purchasable ticket categories and the group-rate constants.
///
/// Constructed once at startup and passed explicitly so the pricing
/// calculator stays pure.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCatalog {
    #[serde(rename = "tickets")]
    pub types: Vec<TicketType>,
    #[serde(rename = "studentRate", serialize_with = "pence_as_pounds")]
    pub student_rate_pence: i32,
    #[serde(rename = "teacherRate", serialize_with = "pence_as_pounds")]
    pub teacher_rate_pence: i32,
}

impl TicketCatalog {
    /// The zoo's standard catalog.
    pub fn standard() -> Self {
        Self {
            types: vec![
                TicketType {
                    id: "adult".to_string(),
                    name: "Adult".to_string(),
                    description: "Ages 16 and over".to_string(),
                    price_pence: 999,
                    kind: TicketKind::Flat,
                },
                TicketType {
                    id: "child".to_string(),
                    name: "Child".to_string(),
                    description: "Ages 3 to 15, under 3s go free".to_string(),
                    price_pence: 699,
                    kind: TicketKind::Flat,
                },
                TicketType {
                    id: "family".to_string(),
                    name: "Family".to_string(),
                    description: "Two adults and up to three children".to_string(),
                    price_pence: 2799,
                    kind: TicketKind::Flat,
                },
                TicketType {
                    id: GROUP_TICKET_ID.to_string(),
                    name: "School Group".to_string(),
                    description: "Priced per student and accompanying teacher".to_string(),
                    price_pence: 0,
                    kind: TicketKind::Group,
                },
            ],
            student_rate_pence: 399,
            teacher_rate_pence: 599,
        }
    }

    /// Unit price of a flat-rate category, `None` for unknown ids and for
    /// the group category.
    pub fn flat_price(&self, id: &str) -> Option<i32> {
        self.types
            .iter()
            .find(|t| t.id == id && t.kind == TicketKind::Flat)
            .map(|t| t.price_pence)
    }

    /// Customer-facing name of a category, `None` for unknown ids.
    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.types
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.as_str())
    }
}
