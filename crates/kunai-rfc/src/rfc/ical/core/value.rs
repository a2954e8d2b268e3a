//! iCalendar property values (RFC 5545 §3.3).

/// Value of a property.
///
/// Only the value types the scheduling layer inspects are resolved; the
/// rest stay as their serialized form in [`Value::Unknown`]. The owning
/// [`super::Property`] always carries the raw string as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// CAL-ADDRESS value (typically a mailto: URI).
    CalAddress(String),
    /// INTEGER value.
    Integer(i32),
    /// TEXT value (unescaped).
    Text(String),
    /// Unresolved value, kept in serialized form.
    Unknown(String),
}

impl Value {
    /// Returns this value as text, if it is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns this value as an integer, if it is an integer value.
    #[must_use]
    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }
}
