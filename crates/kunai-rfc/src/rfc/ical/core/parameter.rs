//! iCalendar parameter types (RFC 5545 §3.2, RFC 6638 §7).

/// A single iCalendar property parameter.
///
/// For example: `ATTENDEE;CN=Jane;PARTSTAT=ACCEPTED:mailto:jane@example.com`
/// carries the parameters `CN` and `PARTSTAT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name (normalized to uppercase).
    pub name: String,
    /// Parameter values. Most parameters have one value, but some
    /// (like MEMBER) carry a comma-separated list.
    pub values: Vec<String>,
}

impl Parameter {
    /// Creates a new parameter with a single value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values: vec![value.into()],
        }
    }

    /// Returns the first (and usually only) value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Returns whether the parameter has the specified value (case-insensitive).
    #[must_use]
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v.eq_ignore_ascii_case(value))
    }

    /// Creates a TZID parameter.
    #[must_use]
    pub fn tzid(tzid: impl Into<String>) -> Self {
        Self::new(names::TZID, tzid)
    }

    /// Creates a VALUE parameter.
    #[must_use]
    pub fn value_type(value_type: impl Into<String>) -> Self {
        Self::new(names::VALUE, value_type)
    }

    /// Creates a CN (common name) parameter.
    #[must_use]
    pub fn cn(name: impl Into<String>) -> Self {
        Self::new(names::CN, name)
    }

    /// Creates a PARTSTAT (participation status) parameter.
    #[must_use]
    pub fn partstat(status: impl Into<String>) -> Self {
        Self::new(names::PARTSTAT, status)
    }

    /// Creates a SCHEDULE-AGENT parameter (RFC 6638 §7.1).
    #[must_use]
    pub fn schedule_agent(agent: impl Into<String>) -> Self {
        Self::new(names::SCHEDULE_AGENT, agent)
    }

    /// Creates a SCHEDULE-FORCE-SEND parameter (RFC 6638 §7.2).
    #[must_use]
    pub fn schedule_force_send(method: impl Into<String>) -> Self {
        Self::new(names::SCHEDULE_FORCE_SEND, method)
    }

    /// Creates a SCHEDULE-STATUS parameter (RFC 6638 §7.3).
    #[must_use]
    pub fn schedule_status(status: impl Into<String>) -> Self {
        Self::new(names::SCHEDULE_STATUS, status)
    }
}

/// Common parameter names as constants.
pub mod names {
    /// Common name.
    pub const CN: &str = "CN";
    /// Participation status.
    pub const PARTSTAT: &str = "PARTSTAT";
    /// Time zone identifier.
    pub const TZID: &str = "TZID";
    /// Value data type.
    pub const VALUE: &str = "VALUE";
    /// Who delivers scheduling messages for a calendar user.
    pub const SCHEDULE_AGENT: &str = "SCHEDULE-AGENT";
    /// Forces a scheduling message of the given method.
    pub const SCHEDULE_FORCE_SEND: &str = "SCHEDULE-FORCE-SEND";
    /// Delivery status of the last scheduling message.
    pub const SCHEDULE_STATUS: &str = "SCHEDULE-STATUS";
}

/// SCHEDULE-AGENT value meaning the server performs scheduling.
pub const SCHEDULE_AGENT_SERVER: &str = "SERVER";

/// PARTSTAT value of an attendee who has not answered yet.
pub const PARTSTAT_NEEDS_ACTION: &str = "NEEDS-ACTION";
