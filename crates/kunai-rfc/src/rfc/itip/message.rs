//! Outbound and inbound scheduling messages.

use super::Method;
use crate::rfc::ical::core::{Component, ComponentKind, ICalendar};

/// A calendar user taking part in a scheduling exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarUser {
    /// Calendar user address (typically a mailto: URI).
    pub address: String,
    /// Display name from the CN parameter.
    pub name: Option<String>,
}

impl CalendarUser {
    #[must_use]
    pub fn new(address: impl Into<String>, name: Option<String>) -> Self {
        Self {
            address: address.into(),
            name,
        }
    }
}

/// An iTIP message addressed to a single recipient.
///
/// `payload` is a complete VCALENDAR whose METHOD property equals `method`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub method: Method,
    /// UID of the calendar object the message is about.
    pub uid: String,
    /// Kind of the embedded components.
    pub component: ComponentKind,
    /// SEQUENCE of the embedded component.
    pub sequence: i32,
    pub sender: CalendarUser,
    pub recipient: CalendarUser,
    /// Whether the change warrants re-notifying the recipient.
    pub significant_change: bool,
    pub payload: ICalendar,
}

impl Message {
    /// Returns the VEVENT/VTODO/VJOURNAL/VFREEBUSY components embedded in the
    /// payload.
    #[must_use]
    pub fn components(&self) -> Vec<&Component> {
        self.payload.components()
    }
}
