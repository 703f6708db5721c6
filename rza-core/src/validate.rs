use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde_json::Value;
use thiserror::Error;

use crate::booking::{BookingSubmission, GroupParty, NewBooking, TicketSelection};
use crate::catalog::GROUP_TICKET_ID;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid value for {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

impl ValidationError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// Checks a raw checkout payload for completeness and shape, returning a
/// normalized booking-creation request. First failure wins; the error
/// names the offending field. No partial acceptance.
pub fn validate_submission(raw: BookingSubmission) -> Result<NewBooking, ValidationError> {
    let visit_date = parse_visit_date(
        raw.selected_date
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ValidationError::MissingField("selectedDate"))?,
    )?;

    let tickets = normalize_tickets(
        raw.tickets
            .filter(|v| !v.is_null())
            .ok_or(ValidationError::MissingField("tickets"))?,
    )?;

    let total_pence = parse_total(
        raw.total
            .filter(|v| !v.is_null())
            .ok_or(ValidationError::MissingField("total"))?,
    )?;

    let card_last_four = raw
        .payment_info
        .and_then(|p| p.card_last_four)
        .filter(|s| !s.trim().is_empty())
        .ok_or(ValidationError::MissingField("paymentInfo.cardLastFour"))?;

    let email = raw
        .email
        .filter(|s| !s.trim().is_empty())
        .ok_or(ValidationError::MissingField("email"))?;

    Ok(NewBooking {
        visit_date,
        tickets,
        total_pence,
        card_last_four,
        email,
    })
}

/// Accepts both RFC 3339 datetimes (what the browser sends) and plain
/// `YYYY-MM-DD` dates. Time of day is irrelevant to a visit.
fn parse_visit_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Ok(datetime.date_naive());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ValidationError::invalid("selectedDate", "not a parseable date"))
}

/// Folds the two accepted ticket shapes (structured object, or the same
/// object JSON-encoded into a string) into a `TicketSelection`.
fn normalize_tickets(raw: Value) -> Result<TicketSelection, ValidationError> {
    let object = match raw {
        Value::Object(map) => map,
        Value::String(encoded) => match serde_json::from_str::<Value>(&encoded) {
            Ok(Value::Object(map)) => map,
            _ => {
                return Err(ValidationError::invalid(
                    "tickets",
                    "string form did not decode to an object",
                ))
            }
        },
        _ => {
            return Err(ValidationError::invalid(
                "tickets",
                "expected an object of category -> quantity",
            ))
        }
    };

    let mut quantities = BTreeMap::new();
    let mut group = None;

    for (key, value) in object {
        if key == GROUP_TICKET_ID && value.is_object() {
            group = Some(parse_group(&value)?);
            continue;
        }

        let quantity = value
            .as_i64()
            .ok_or_else(|| ValidationError::invalid("tickets", format!("{key} is not an integer")))?;
        // Anything that does not fit a u32 is rejected outright rather
        // than truncated, negatives included.
        let quantity = u32::try_from(quantity).map_err(|_| {
            ValidationError::invalid("tickets", format!("{key} quantity is out of range"))
        })?;

        quantities.insert(key, quantity);
    }

    Ok(TicketSelection { quantities, group })
}

fn parse_group(value: &Value) -> Result<GroupParty, ValidationError> {
    let count = |field: &str| -> Result<u32, ValidationError> {
        match value.get(field) {
            None | Some(Value::Null) => Ok(0),
            Some(v) => v
                .as_i64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| {
                    ValidationError::invalid(
                        "tickets",
                        format!("group.{field} is not a non-negative integer"),
                    )
                }),
        }
    };

    Ok(GroupParty {
        students: count("students")?,
        teachers: count("teachers")?,
    })
}

/// The total arrives as a JSON number or a numeric string; either way it
/// must be a finite, non-negative two-decimal amount.
fn parse_total(raw: Value) -> Result<i32, ValidationError> {
    let pounds = match &raw {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ValidationError::invalid("total", "not a representable number"))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::invalid("total", "not a parseable number"))?,
        _ => return Err(ValidationError::invalid("total", "expected a number")),
    };

    if !pounds.is_finite() || pounds < 0.0 {
        return Err(ValidationError::invalid(
            "total",
            "must be a finite, non-negative amount",
        ));
    }

    let pence = (pounds * 100.0).round();
    if pence > i32::MAX as f64 {
        return Err(ValidationError::invalid(
            "total",
            "exceeds the maximum representable amount",
        ));
    }

    Ok(pence as i32)
}
