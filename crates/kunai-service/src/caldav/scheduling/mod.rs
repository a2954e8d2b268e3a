//! iTIP scheduling (RFC 5546, RFC 6638).
//!
//! Computes the messages an organizer's change requires and applies inbound
//! cancellations to an attendee's copy.

mod broker;
mod cancel;
pub mod delta;
mod event_info;
pub mod exdate;
mod message;
mod organizer;
mod sanitize;

pub use broker::TipBroker;
pub use delta::{AttendeeDelta, ComponentDelta, PropertyDelta, attendee_delta, component_delta};
pub use event_info::{AttendeeInfo, EventInfo};
pub use exdate::{ExdateDelta, exdate_delta};
pub use sanitize::sanitize_scheduling;
