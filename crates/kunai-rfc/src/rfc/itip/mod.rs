//! iTIP (RFC 5546) message model.

mod message;
mod method;

pub use message::{CalendarUser, Message};
pub use method::Method;
