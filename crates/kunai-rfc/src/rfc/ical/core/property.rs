//! iCalendar property types (RFC 5545 §3.1, §3.8).

use super::{Parameter, Value, param_names};

/// A fully parsed iCalendar property.
///
/// Contains the parsed value along with the original raw value.
/// Comparisons in the scheduling layer are made on `raw_value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name (normalized to uppercase).
    pub name: String,
    /// Parameters in order of appearance.
    pub params: Vec<Parameter>,
    /// Parsed value.
    pub value: Value,
    /// Original raw value string.
    pub raw_value: String,
}

impl Property {
    /// Creates a property with a text value.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value_str = value.into();
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value: Value::Text(value_str.clone()),
            raw_value: value_str,
        }
    }

    /// Creates a property with an integer value.
    #[must_use]
    pub fn integer(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value: Value::Integer(value),
            raw_value: value.to_string(),
        }
    }

    /// Creates a property with a calendar user address value
    /// (ORGANIZER, ATTENDEE).
    #[must_use]
    pub fn cal_address(name: impl Into<String>, address: impl Into<String>) -> Self {
        let address = address.into();
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value: Value::CalAddress(address.clone()),
            raw_value: address,
        }
    }

    /// Creates a property whose value is kept in serialized form
    /// (date-times, recurrence rules, and other unresolved types).
    #[must_use]
    pub fn raw(name: impl Into<String>, raw_value: impl Into<String>) -> Self {
        let raw_value = raw_value.into();
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value: Value::Unknown(raw_value.clone()),
            raw_value,
        }
    }

    /// Returns this property with `param` set.
    #[must_use]
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.set_param(param);
        self
    }

    /// Returns the parameter with the given name.
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&Parameter> {
        let name_upper = name.to_ascii_uppercase();
        self.params.iter().find(|p| p.name == name_upper)
    }

    /// Returns the value of a parameter.
    #[must_use]
    pub fn get_param_value(&self, name: &str) -> Option<&str> {
        let p = self.get_param(name)?;
        p.value()
    }

    /// Returns whether this property has a parameter with the given name.
    #[must_use]
    pub fn has_param(&self, name: &str) -> bool {
        self.get_param(name).is_some()
    }

    /// Adds a parameter to this property.
    pub fn add_param(&mut self, param: Parameter) {
        self.params.push(param);
    }

    /// Sets a parameter, replacing any existing parameter with the same name.
    pub fn set_param(&mut self, param: Parameter) {
        self.params.retain(|p| p.name != param.name);
        self.params.push(param);
    }

    /// Removes every parameter with the given name.
    pub fn remove_param(&mut self, name: &str) {
        let name_upper = name.to_ascii_uppercase();
        self.params.retain(|p| p.name != name_upper);
    }

    /// Returns the serialized value.
    #[must_use]
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    /// Returns the CN parameter, if present.
    #[must_use]
    pub fn common_name(&self) -> Option<&str> {
        self.get_param_value(param_names::CN)
    }

    /// Returns the value as text if it is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        self.value.as_text()
    }

    /// Returns the value as an integer.
    ///
    /// Falls back to parsing the raw value for properties built from
    /// unresolved text.
    #[must_use]
    pub fn as_integer(&self) -> Option<i32> {
        self.value
            .as_integer()
            .or_else(|| self.raw_value.trim().parse().ok())
    }
}

/// Property names that occur at most once per component.
///
/// Anything not listed here is compared as a multi-valued property.
pub const SINGLETON_PROPERTIES: &[&str] = &[
    names::UID,
    names::DTSTAMP,
    names::CREATED,
    names::LAST_MODIFIED,
    names::DTSTART,
    names::DTEND,
    names::DURATION,
    names::RRULE,
    names::STATUS,
    names::CLASS,
    names::PRIORITY,
    names::TRANSP,
    names::ORGANIZER,
    names::SUMMARY,
    names::DESCRIPTION,
    names::GEO,
    names::LOCATION,
];

/// Returns whether `name` is a singleton property.
#[must_use]
pub fn is_singleton_property(name: &str) -> bool {
    SINGLETON_PROPERTIES
        .iter()
        .any(|p| p.eq_ignore_ascii_case(name))
}

/// Occurrences of one property name on a component.
///
/// Singleton properties resolve to their first occurrence; everything
/// else resolves to all occurrences in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertySlot<'a> {
    /// A property that occurs at most once.
    Single(&'a Property),
    /// A property that may occur several times.
    Multi(Vec<&'a Property>),
}

impl<'a> PropertySlot<'a> {
    /// Returns the occurrences held by this slot.
    #[must_use]
    pub fn properties(&self) -> Vec<&'a Property> {
        match self {
            Self::Single(p) => vec![*p],
            Self::Multi(ps) => ps.clone(),
        }
    }

    /// Returns the raw values held by this slot.
    #[must_use]
    pub fn raw_values(&self) -> Vec<&'a str> {
        self.properties()
            .into_iter()
            .map(|p| p.raw_value.as_str())
            .collect()
    }
}

/// Common property names as constants.
pub mod names {
    // Calendar properties
    pub const METHOD: &str = "METHOD";
    pub const PRODID: &str = "PRODID";
    pub const VERSION: &str = "VERSION";

    // Descriptive component properties
    pub const CLASS: &str = "CLASS";
    pub const DESCRIPTION: &str = "DESCRIPTION";
    pub const GEO: &str = "GEO";
    pub const LOCATION: &str = "LOCATION";
    pub const PRIORITY: &str = "PRIORITY";
    pub const STATUS: &str = "STATUS";
    pub const SUMMARY: &str = "SUMMARY";

    // Date and time properties
    pub const DTEND: &str = "DTEND";
    pub const DTSTART: &str = "DTSTART";
    pub const DURATION: &str = "DURATION";
    pub const TRANSP: &str = "TRANSP";

    // Relationship properties
    pub const ATTENDEE: &str = "ATTENDEE";
    pub const ORGANIZER: &str = "ORGANIZER";
    pub const RECURRENCE_ID: &str = "RECURRENCE-ID";
    pub const UID: &str = "UID";

    // Recurrence properties
    pub const EXDATE: &str = "EXDATE";
    pub const RDATE: &str = "RDATE";
    pub const RRULE: &str = "RRULE";

    // Change management properties
    pub const CREATED: &str = "CREATED";
    pub const DTSTAMP: &str = "DTSTAMP";
    pub const LAST_MODIFIED: &str = "LAST-MODIFIED";
    pub const SEQUENCE: &str = "SEQUENCE";
}

/// STATUS value of a cancelled component.
pub const STATUS_CANCELLED: &str = "CANCELLED";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_text() {
        let prop = Property::text("summary", "Meeting");
        assert_eq!(prop.name, "SUMMARY");
        assert_eq!(prop.as_text(), Some("Meeting"));
    }

    #[test]
    fn integer_from_raw_value() {
        assert_eq!(Property::integer("SEQUENCE", 5).as_integer(), Some(5));
        assert_eq!(Property::raw("SEQUENCE", " 7").as_integer(), Some(7));
        assert_eq!(Property::raw("SEQUENCE", "x").as_integer(), None);
    }

    #[test]
    fn params_set_and_remove() {
        let mut prop = Property::cal_address("ATTENDEE", "mailto:a@example.com")
            .with_param(Parameter::cn("A"))
            .with_param(Parameter::schedule_status("1.2"));
        prop.set_param(Parameter::cn("Alice"));
        assert_eq!(prop.common_name(), Some("Alice"));
        assert_eq!(prop.params.len(), 2);

        prop.remove_param("schedule-status");
        assert!(!prop.has_param(param_names::SCHEDULE_STATUS));
    }

    #[test]
    fn singleton_table() {
        assert!(is_singleton_property("ORGANIZER"));
        assert!(is_singleton_property("summary"));
        assert!(!is_singleton_property("ATTENDEE"));
        assert!(!is_singleton_property("EXDATE"));
        assert!(!is_singleton_property("SEQUENCE"));
    }
}
