pub mod booking;
pub mod catalog;
pub mod pricing;
pub mod user;
pub mod validate;

pub use booking::{Booking, BookingSubmission, GroupParty, NewBooking, TicketSelection};
pub use catalog::{TicketCatalog, TicketKind, TicketType};
pub use user::{NewUser, User};
pub use validate::ValidationError;
