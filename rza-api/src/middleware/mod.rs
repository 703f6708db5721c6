pub mod session;

pub use session::{require_session, resolve_identity, SessionUser};
