use chrono::NaiveDate;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use uuid::Uuid;

use rza_core::booking::{NewBooking, TicketSelection};
use rza_core::catalog::TicketCatalog;

#[derive(Debug, Error)]
pub enum NotificationError {
    /// SMTP credentials are absent. A fatal configuration error surfaced
    /// at send time, never a silent no-op.
    #[error("SMTP credentials are not configured: {0}")]
    Config(String),
    #[error("invalid email address: {0}")]
    Address(String),
    #[error("failed to compose confirmation email: {0}")]
    Compose(String),
    #[error("SMTP transport failure: {0}")]
    Transport(String),
}

#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_name: String,
    pub from_address: String,
}

/// Formats and dispatches booking-confirmation emails over SMTP.
///
/// Best-effort relative to booking persistence: callers invoke this only
/// after the booking is durably stored, and a failure here must never
/// unwind it.
pub struct Mailer {
    config: MailerConfig,
}

impl Mailer {
    pub fn new(config: MailerConfig) -> Self {
        Self { config }
    }

    pub fn is_configured(&self) -> bool {
        !self.config.username.is_empty() && !self.config.password.is_empty()
    }

    /// Sends the confirmation for a stored booking, returning the message
    /// id on acceptance by the relay.
    pub async fn send_booking_confirmation(
        &self,
        details: &NewBooking,
        catalog: &TicketCatalog,
    ) -> Result<String, NotificationError> {
        if !self.is_configured() {
            return Err(NotificationError::Config(
                "set smtp.username and smtp.password".to_string(),
            ));
        }

        let to: Mailbox = details
            .email
            .parse()
            .map_err(|_| NotificationError::Address(details.email.clone()))?;
        let from: Mailbox = format!("{} <{}>", self.config.from_name, self.config.from_address)
            .parse()
            .map_err(|_| NotificationError::Address(self.config.from_address.clone()))?;

        let message_id = format!("<{}@{}>", Uuid::new_v4(), self.config.host);

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject("Your RZA Zoo Booking Confirmation")
            .message_id(Some(message_id.clone()))
            .header(ContentType::TEXT_HTML)
            .body(confirmation_body(details, catalog))
            .map_err(|e| NotificationError::Compose(e.to_string()))?;

        self.transport()?
            .send(message)
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        tracing::info!(email = %details.email, %message_id, "booking confirmation sent");
        Ok(message_id)
    }

    /// Checks the relay is reachable with the configured credentials.
    pub async fn verify(&self) -> Result<bool, NotificationError> {
        self.transport()?
            .test_connection()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))
    }

    // A fresh transport per send keeps connection state out of the Mailer.
    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotificationError> {
        let credentials = Credentials::new(
            self.config.username.clone(),
            self.config.password.clone(),
        );

        Ok(AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)
            .map_err(|e| NotificationError::Transport(e.to_string()))?
            .port(self.config.port)
            .credentials(credentials)
            .build())
    }
}

/// "Saturday, 14 June 2025"
fn format_visit_date(date: NaiveDate) -> String {
    date.format("%A, %-d %B %Y").to_string()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// One line per purchased category, group party included. Category ids
/// render under their catalog names; ids the catalog does not know fall
/// back to plain capitalization.
fn ticket_lines(selection: &TicketSelection, catalog: &TicketCatalog) -> String {
    let mut lines: Vec<String> = selection
        .quantities
        .iter()
        .filter(|(_, quantity)| **quantity > 0)
        .map(|(id, quantity)| {
            let name = catalog
                .display_name(id)
                .map(str::to_string)
                .unwrap_or_else(|| capitalize(id));
            format!("{quantity}x {name}")
        })
        .collect();

    if let Some(group) = &selection.group {
        if group.students > 0 {
            lines.push(format!("{}x Student (group rate)", group.students));
        }
        if group.teachers > 0 {
            lines.push(format!("{}x Teacher (group rate)", group.teachers));
        }
    }

    lines.join("\n")
}

fn confirmation_body(details: &NewBooking, catalog: &TicketCatalog) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <div style="background-color: #2F5233; padding: 20px; border-radius: 8px; margin-bottom: 20px;">
    <h1 style="color: white; margin: 0; text-align: center;">Booking Confirmation</h1>
  </div>
  <div style="background-color: #f9f9f9; padding: 20px; border-radius: 8px; border: 2px solid #2F5233;">
    <h2 style="color: #2F5233; margin-top: 0;">Thank you for your booking!</h2>
    <div style="margin-bottom: 20px;">
      <h3 style="color: #2F5233;">Visit Date</h3>
      <p style="margin: 5px 0;">{visit_date}</p>
    </div>
    <div style="margin-bottom: 20px;">
      <h3 style="color: #2F5233;">Tickets</h3>
      <pre style="margin: 5px 0;">{tickets}</pre>
    </div>
    <div style="margin-bottom: 20px;">
      <h3 style="color: #2F5233;">Payment Details</h3>
      <p style="margin: 5px 0;">Total Paid: &pound;{total:.2}</p>
      <p style="margin: 5px 0;">Card ending in: {card_last_four}</p>
    </div>
  </div>
  <div style="text-align: center; margin-top: 20px; color: #666;">
    <p>If you have any questions about your booking, please contact us at rza.enquiries@gmail.com</p>
  </div>
</div>"#,
        visit_date = format_visit_date(details.visit_date),
        tickets = ticket_lines(&details.tickets, catalog),
        total = f64::from(details.total_pence) / 100.0,
        card_last_four = details.card_last_four,
    )
}
