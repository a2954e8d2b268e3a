//! iCalendar component types (RFC 5545 §3.4-3.6).

use kunai_core::constants::{MASTER_INSTANCE_ID, PRODID};

use super::{Property, PropertySlot, is_singleton_property, names};
use crate::error::{RfcError, RfcResult};

/// Component kind for iCalendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// VCALENDAR wrapper component.
    Calendar,
    /// VEVENT component.
    Event,
    /// VTODO component.
    Todo,
    /// VJOURNAL component.
    Journal,
    /// VFREEBUSY component.
    FreeBusy,
    /// VTIMEZONE component.
    Timezone,
    /// VALARM component (nested within VEVENT/VTODO).
    Alarm,
    /// Unknown/X-component.
    Unknown,
}

impl ComponentKind {
    /// Returns the string name for this component kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calendar => "VCALENDAR",
            Self::Event => "VEVENT",
            Self::Todo => "VTODO",
            Self::Journal => "VJOURNAL",
            Self::FreeBusy => "VFREEBUSY",
            Self::Timezone => "VTIMEZONE",
            Self::Alarm => "VALARM",
            Self::Unknown => "X-UNKNOWN",
        }
    }

    /// Parses a component kind from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "VCALENDAR" => Self::Calendar,
            "VEVENT" => Self::Event,
            "VTODO" => Self::Todo,
            "VJOURNAL" => Self::Journal,
            "VFREEBUSY" => Self::FreeBusy,
            "VTIMEZONE" => Self::Timezone,
            "VALARM" => Self::Alarm,
            _ => Self::Unknown,
        }
    }

    /// Returns whether this is a schedulable component (VEVENT, VTODO, VJOURNAL).
    #[must_use]
    pub const fn is_schedulable(self) -> bool {
        matches!(self, Self::Event | Self::Todo | Self::Journal)
    }

    /// Returns whether this kind makes up the body of a calendar object
    /// resource (schedulable components plus VFREEBUSY).
    #[must_use]
    pub const fn is_calendar_object(self) -> bool {
        self.is_schedulable() || matches!(self, Self::FreeBusy)
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An iCalendar component.
///
/// Components can contain properties and nested sub-components.
/// For example, a VCALENDAR contains VEVENTs, which may contain VALARMs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Component {
    /// Component type/name.
    pub kind: Option<ComponentKind>,
    /// Original component name (preserved for X-components).
    pub name: String,
    /// Properties in order of appearance.
    pub properties: Vec<Property>,
    /// Nested sub-components.
    pub children: Vec<Component>,
}

impl Component {
    /// Creates a new component with the given kind.
    #[must_use]
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind: Some(kind),
            name: kind.as_str().to_string(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates a VCALENDAR component.
    #[must_use]
    pub fn calendar() -> Self {
        Self::new(ComponentKind::Calendar)
    }

    /// Creates a VEVENT component.
    #[must_use]
    pub fn event() -> Self {
        Self::new(ComponentKind::Event)
    }

    /// Creates a VTIMEZONE component.
    #[must_use]
    pub fn timezone() -> Self {
        Self::new(ComponentKind::Timezone)
    }

    /// Returns this component with `prop` appended.
    #[must_use]
    pub fn with_property(mut self, prop: Property) -> Self {
        self.add_property(prop);
        self
    }

    /// Adds a property to this component.
    pub fn add_property(&mut self, prop: Property) {
        self.properties.push(prop);
    }

    /// Replaces the first property named like `prop` in place and drops any
    /// further occurrences. Appends `prop` when none exists.
    pub fn set_property(&mut self, prop: Property) {
        match self.properties.iter().position(|p| p.name == prop.name) {
            Some(index) => {
                let name = prop.name.clone();
                self.properties[index] = prop;
                let mut seen = 0usize;
                self.properties.retain(|p| {
                    if p.name != name {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.properties.push(prop),
        }
    }

    /// Removes every property with the given name.
    pub fn remove_properties(&mut self, name: &str) {
        let name_upper = name.to_ascii_uppercase();
        self.properties.retain(|p| p.name != name_upper);
    }

    /// Adds a child component.
    pub fn add_child(&mut self, child: Component) {
        self.children.push(child);
    }

    /// Returns the first property with the given name.
    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        let name_upper = name.to_ascii_uppercase();
        self.properties.iter().find(|p| p.name == name_upper)
    }

    /// Returns the first property with the given name, mutably.
    pub fn get_property_mut(&mut self, name: &str) -> Option<&mut Property> {
        let name_upper = name.to_ascii_uppercase();
        self.properties.iter_mut().find(|p| p.name == name_upper)
    }

    /// Returns all properties with the given name.
    #[must_use]
    pub fn get_properties(&self, name: &str) -> Vec<&Property> {
        let name_upper = name.to_ascii_uppercase();
        self.properties
            .iter()
            .filter(|p| p.name == name_upper)
            .collect()
    }

    /// Returns all properties with the given name, mutably.
    pub fn get_properties_mut(&mut self, name: &str) -> impl Iterator<Item = &mut Property> {
        let name_upper = name.to_ascii_uppercase();
        self.properties
            .iter_mut()
            .filter(move |p| p.name == name_upper)
    }

    /// Returns the distinct property names in order of first appearance.
    #[must_use]
    pub fn property_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for prop in &self.properties {
            if !names.contains(&prop.name.as_str()) {
                names.push(prop.name.as_str());
            }
        }
        names
    }

    /// Returns the occurrences of `name`, shaped by whether it is a
    /// singleton property. `None` when the property is absent.
    #[must_use]
    pub fn slot(&self, name: &str) -> Option<PropertySlot<'_>> {
        if is_singleton_property(name) {
            self.get_property(name).map(PropertySlot::Single)
        } else {
            let props = self.get_properties(name);
            (!props.is_empty()).then_some(PropertySlot::Multi(props))
        }
    }

    /// Returns the UID property value if present.
    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.get_property(names::UID).map(Property::raw_value)
    }

    /// Returns the SUMMARY property value if present.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.get_property(names::SUMMARY)?.as_text()
    }

    /// Returns the STATUS value if present.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.get_property(names::STATUS).map(Property::raw_value)
    }

    /// Returns the SEQUENCE value if present and numeric.
    #[must_use]
    pub fn sequence(&self) -> Option<i32> {
        self.get_property(names::SEQUENCE)?.as_integer()
    }

    /// Returns the RECURRENCE-ID raw value if this is an override.
    #[must_use]
    pub fn recurrence_id(&self) -> Option<&str> {
        self.get_property(names::RECURRENCE_ID)
            .map(Property::raw_value)
    }

    /// Returns the instance id: the RECURRENCE-ID value, or `"master"`.
    #[must_use]
    pub fn instance_id(&self) -> String {
        self.recurrence_id()
            .unwrap_or(MASTER_INSTANCE_ID)
            .to_string()
    }

    /// Returns the ORGANIZER property if present.
    #[must_use]
    pub fn organizer(&self) -> Option<&Property> {
        self.get_property(names::ORGANIZER)
    }

    /// Returns all ATTENDEE properties.
    #[must_use]
    pub fn attendees(&self) -> Vec<&Property> {
        self.get_properties(names::ATTENDEE)
    }

    /// Returns the component kind, falling back to the name when the kind
    /// was not resolved.
    #[must_use]
    pub fn component_kind(&self) -> ComponentKind {
        self.kind
            .unwrap_or_else(|| ComponentKind::parse(&self.name))
    }

    /// Returns children of a specific kind.
    #[must_use]
    pub fn children_of_kind(&self, kind: ComponentKind) -> Vec<&Component> {
        self.children
            .iter()
            .filter(|c| c.component_kind() == kind)
            .collect()
    }

    /// Returns whether this component is a VEVENT, VTODO, VJOURNAL or
    /// VFREEBUSY.
    #[must_use]
    pub fn is_calendar_object(&self) -> bool {
        self.component_kind().is_calendar_object()
    }
}

/// Top-level iCalendar object.
///
/// This is a convenience wrapper around a VCALENDAR component
/// with helper methods for common operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ICalendar {
    /// The root VCALENDAR component.
    pub root: Component,
}

impl ICalendar {
    /// Creates a new empty iCalendar with required properties.
    #[must_use]
    pub fn new(prodid: impl Into<String>) -> Self {
        let mut root = Component::calendar();
        root.add_property(Property::text(names::VERSION, "2.0"));
        root.add_property(Property::text(names::PRODID, prodid));
        Self { root }
    }

    /// Returns the PRODID value.
    #[must_use]
    pub fn prodid(&self) -> Option<&str> {
        self.root.get_property(names::PRODID)?.as_text()
    }

    /// Returns the VERSION value.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.root.get_property(names::VERSION)?.as_text()
    }

    /// Returns the METHOD value if present.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.root
            .get_property(names::METHOD)
            .map(Property::raw_value)
    }

    /// Adds a component (VEVENT, VTODO, VTIMEZONE, ...).
    pub fn add_component(&mut self, component: Component) {
        self.root.add_child(component);
    }

    /// Returns the VEVENT, VTODO, VJOURNAL and VFREEBUSY components.
    #[must_use]
    pub fn components(&self) -> Vec<&Component> {
        self.root
            .children
            .iter()
            .filter(|c| c.is_calendar_object())
            .collect()
    }

    /// Returns the VEVENT, VTODO, VJOURNAL and VFREEBUSY components, mutably.
    pub fn components_mut(&mut self) -> impl Iterator<Item = &mut Component> {
        self.root
            .children
            .iter_mut()
            .filter(|c| c.is_calendar_object())
    }

    /// Returns the component without RECURRENCE-ID, if any.
    #[must_use]
    pub fn base_component(&self) -> Option<&Component> {
        self.components()
            .into_iter()
            .find(|c| c.recurrence_id().is_none())
    }

    /// Returns all VTIMEZONE components.
    #[must_use]
    pub fn timezones(&self) -> Vec<&Component> {
        self.root.children_of_kind(ComponentKind::Timezone)
    }

    /// ## Summary
    /// Returns the UID and kind shared by every calendar object component.
    ///
    /// `Ok(None)` when the calendar carries no such component.
    ///
    /// ## Errors
    /// Returns an error if a component lacks a UID, or if components
    /// disagree on UID or kind.
    pub fn object_identity(&self) -> RfcResult<Option<(&str, ComponentKind)>> {
        let mut identity: Option<(&str, ComponentKind)> = None;
        for component in self.components() {
            let uid = component.uid().ok_or_else(|| {
                RfcError::ValidationError(format!("{} without UID", component.name))
            })?;
            let kind = component.component_kind();
            match identity {
                None => identity = Some((uid, kind)),
                Some((seen_uid, _)) if seen_uid != uid => {
                    return Err(RfcError::ValidationError(format!(
                        "calendar object mixes UIDs {seen_uid} and {uid}"
                    )));
                }
                Some((_, seen_kind)) if seen_kind != kind => {
                    return Err(RfcError::ValidationError(format!(
                        "calendar object mixes {seen_kind} and {kind}"
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(identity)
    }
}

impl Default for ICalendar {
    fn default() -> Self {
        Self::new(PRODID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(uid: &str) -> Component {
        Component::event().with_property(Property::text("UID", uid))
    }

    #[test]
    fn component_kind_parse() {
        assert_eq!(ComponentKind::parse("VEVENT"), ComponentKind::Event);
        assert_eq!(ComponentKind::parse("vtodo"), ComponentKind::Todo);
        assert_eq!(ComponentKind::parse("X-CUSTOM"), ComponentKind::Unknown);
        assert!(ComponentKind::FreeBusy.is_calendar_object());
        assert!(!ComponentKind::Timezone.is_calendar_object());
    }

    #[test]
    fn unresolved_kind_falls_back_to_name() {
        let mut ical = ICalendar::default();
        ical.add_component(Component {
            name: "VTODO".to_string(),
            properties: vec![Property::text("UID", "task-1")],
            ..Component::default()
        });
        assert_eq!(ical.components().len(), 1);
        assert!(matches!(
            ical.object_identity(),
            Ok(Some(("task-1", ComponentKind::Todo)))
        ));
    }

    #[test]
    fn icalendar_new() {
        let ical = ICalendar::new("-//Test//Test//EN");
        assert_eq!(ical.version(), Some("2.0"));
        assert_eq!(ical.prodid(), Some("-//Test//Test//EN"));
        assert_eq!(ical.method(), None);
    }

    #[test]
    fn set_property_replaces_in_place() {
        let mut event = event("a")
            .with_property(Property::text("STATUS", "CONFIRMED"))
            .with_property(Property::text("SUMMARY", "x"))
            .with_property(Property::text("STATUS", "TENTATIVE"));

        event.set_property(Property::text("STATUS", "CANCELLED"));

        let names: Vec<&str> = event.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["UID", "STATUS", "SUMMARY"]);
        assert_eq!(event.status(), Some("CANCELLED"));

        event.set_property(Property::integer("SEQUENCE", 2));
        assert_eq!(event.properties.last().map(|p| p.name.as_str()), Some("SEQUENCE"));
    }

    #[test]
    fn slot_shape_follows_singleton_table() {
        let event = event("a")
            .with_property(Property::text("SUMMARY", "one"))
            .with_property(Property::text("SUMMARY", "two"))
            .with_property(Property::raw("EXDATE", "20240101T100000Z"))
            .with_property(Property::raw("EXDATE", "20240108T100000Z"));

        let summary = event.slot("SUMMARY").expect("summary present");
        assert_eq!(summary.raw_values(), vec!["one"]);
        assert!(matches!(summary, PropertySlot::Single(_)));

        let exdate = event.slot("EXDATE").expect("exdate present");
        assert_eq!(exdate.raw_values().len(), 2);
        assert!(event.slot("RDATE").is_none());
        assert_eq!(event.property_names(), vec!["UID", "SUMMARY", "EXDATE"]);
    }

    #[test]
    fn instance_ids() {
        let master = event("a");
        let over = event("a").with_property(Property::raw("RECURRENCE-ID", "20240101T100000Z"));
        assert_eq!(master.instance_id(), "master");
        assert_eq!(over.instance_id(), "20240101T100000Z");
    }

    #[test]
    fn object_identity_rejects_mixed_uids() {
        let mut ical = ICalendar::default();
        ical.add_component(Component::timezone());
        assert!(matches!(ical.object_identity(), Ok(None)));

        ical.add_component(event("a"));
        ical.add_component(event("a"));
        assert!(matches!(
            ical.object_identity(),
            Ok(Some(("a", ComponentKind::Event)))
        ));

        ical.add_component(event("b"));
        assert!(ical.object_identity().is_err());
    }

    #[test]
    fn base_component_skips_overrides_and_timezones() {
        let mut ical = ICalendar::default();
        ical.add_component(Component::timezone());
        ical.add_component(
            event("a").with_property(Property::raw("RECURRENCE-ID", "20240101T100000Z")),
        );
        ical.add_component(event("a").with_property(Property::text("SUMMARY", "base")));

        assert_eq!(ical.components().len(), 2);
        assert_eq!(
            ical.base_component().and_then(Component::summary),
            Some("base")
        );
    }
}
