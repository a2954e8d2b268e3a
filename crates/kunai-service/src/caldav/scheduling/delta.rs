//! Property-level and attendee-level differences between two versions of a
//! component.

use indexmap::IndexMap;
use kunai_rfc::rfc::ical::core::{Component, Property, PropertySlot, names};

/// Before and after state of one property name.
///
/// `original == None` means the property was added (or there is no original
/// component at all); `mutated == None` means it was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDelta<'a> {
    pub mutated: Option<PropertySlot<'a>>,
    pub original: Option<PropertySlot<'a>>,
}

/// Changed, added and removed properties keyed by name, in the order the
/// names first appear on the mutated then the original component.
pub type ComponentDelta<'a> = IndexMap<String, PropertyDelta<'a>>;

/// ## Summary
/// Computes the properties that differ between `mutated` and `original`.
///
/// Singleton properties compare the raw value of their first occurrence
/// only; parameters are ignored. Multi-valued properties are changed when
/// the occurrence counts differ, or when an original occurrence has no
/// equal-valued occurrence on the mutated side.
///
/// Without an original every mutated property is reported.
#[must_use]
pub fn component_delta<'a>(
    mutated: &'a Component,
    original: Option<&'a Component>,
) -> ComponentDelta<'a> {
    let mut delta: ComponentDelta<'a> = mutated
        .property_names()
        .into_iter()
        .filter_map(|name| {
            mutated.slot(name).map(|slot| {
                (
                    name.to_string(),
                    PropertyDelta {
                        mutated: Some(slot),
                        original: None,
                    },
                )
            })
        })
        .collect();

    let Some(original) = original else {
        return delta;
    };

    for name in original.property_names() {
        let Some(original_slot) = original.slot(name) else {
            continue;
        };
        let changed = delta
            .get(name)
            .and_then(|entry| entry.mutated.as_ref())
            .map(|mutated_slot| slot_changed(mutated_slot, &original_slot));

        match changed {
            Some(true) => {
                tracing::trace!(property = name, "Property changed");
                if let Some(entry) = delta.get_mut(name) {
                    entry.original = Some(original_slot);
                }
            }
            Some(false) => {
                delta.shift_remove(name);
            }
            None => {
                delta.insert(
                    name.to_string(),
                    PropertyDelta {
                        mutated: None,
                        original: Some(original_slot),
                    },
                );
            }
        }
    }

    delta
}

fn slot_changed(mutated: &PropertySlot<'_>, original: &PropertySlot<'_>) -> bool {
    if let (PropertySlot::Single(m), PropertySlot::Single(o)) = (mutated, original) {
        return m.raw_value != o.raw_value;
    }

    let mutated_values = mutated.raw_values();
    let original_values = original.raw_values();
    // occurrences created or deleted
    if mutated_values.len() != original_values.len() {
        return true;
    }
    // occurrences modified
    original_values
        .iter()
        .any(|value| !mutated_values.contains(value))
}

/// Returns whether any property in `delta` is listed in `significant`.
#[must_use]
pub fn is_significant(delta: &ComponentDelta<'_>, significant: &[String]) -> bool {
    delta
        .keys()
        .any(|name| significant.iter().any(|s| s == name))
}

/// Attendees of a component split by how they changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendeeDelta<'a> {
    /// On the mutated component only.
    pub added: Vec<&'a Property>,
    /// On the original component only.
    pub removed: Vec<&'a Property>,
    /// On both; the mutated occurrence is kept.
    pub extant: Vec<&'a Property>,
}

impl AttendeeDelta<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.extant.is_empty()
    }
}

/// ## Summary
/// Splits the ATTENDEE properties of `mutated` and `original` into added,
/// removed and extant sets, comparing calendar user addresses.
#[must_use]
pub fn attendee_delta<'a>(
    mutated: &'a Component,
    original: Option<&'a Component>,
) -> AttendeeDelta<'a> {
    let mutated_attendees = mutated.attendees();
    let original_attendees = original.map(Component::attendees).unwrap_or_default();

    let (extant, added) = mutated_attendees
        .iter()
        .partition(|a| contains(&original_attendees, a));
    let removed = original_attendees
        .iter()
        .filter(|a| !contains(&mutated_attendees, a))
        .copied()
        .collect();

    AttendeeDelta {
        added,
        removed,
        extant,
    }
}

fn contains(set: &[&Property], attendee: &Property) -> bool {
    set.iter().any(|a| a.raw_value == attendee.raw_value)
}

/// Returns whether `delta` touches the EXDATE property.
#[must_use]
pub fn touches_exdate(delta: &ComponentDelta<'_>) -> bool {
    delta.contains_key(names::EXDATE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kunai_core::constants::SIGNIFICANT_CHANGE_PROPERTIES;
    use kunai_rfc::rfc::ical::core::Parameter;

    fn attendee(address: &str) -> Property {
        Property::cal_address("ATTENDEE", address)
    }

    fn base() -> Component {
        Component::event()
            .with_property(Property::text("UID", "evt-1"))
            .with_property(Property::text("SUMMARY", "Planning"))
            .with_property(Property::raw("DTSTART", "20240101T100000Z"))
            .with_property(Property::cal_address("ORGANIZER", "mailto:org@x"))
            .with_property(attendee("mailto:a@x"))
            .with_property(attendee("mailto:b@x"))
    }

    fn addresses(set: &[&Property]) -> Vec<String> {
        set.iter().map(|p| p.raw_value.clone()).collect()
    }

    fn significant() -> Vec<String> {
        SIGNIFICANT_CHANGE_PROPERTIES
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn identical_components_have_no_delta() {
        let c = base();
        assert!(component_delta(&c, Some(&c.clone())).is_empty());
    }

    #[test]
    fn without_original_everything_is_added() {
        let c = base();
        let delta = component_delta(&c, None);
        assert_eq!(
            delta.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["UID", "SUMMARY", "DTSTART", "ORGANIZER", "ATTENDEE"]
        );
        assert!(delta.values().all(|d| d.original.is_none()));
        assert!(is_significant(&delta, &significant()));
    }

    #[test]
    fn singleton_change_records_both_sides() {
        let original = base();
        let mut mutated = base();
        mutated.set_property(Property::text("SUMMARY", "Retro"));

        let delta = component_delta(&mutated, Some(&original));
        assert_eq!(delta.len(), 1);
        let summary = &delta["SUMMARY"];
        assert_eq!(
            summary.mutated.as_ref().map(PropertySlot::raw_values),
            Some(vec!["Retro"])
        );
        assert_eq!(
            summary.original.as_ref().map(PropertySlot::raw_values),
            Some(vec!["Planning"])
        );
        assert!(is_significant(&delta, &significant()));
    }

    #[test]
    fn singleton_parameter_change_is_not_a_delta() {
        let original = base();
        let mut mutated = base();
        mutated.set_property(
            Property::cal_address("ORGANIZER", "mailto:org@x").with_param(Parameter::cn("Org")),
        );
        assert!(component_delta(&mutated, Some(&original)).is_empty());
    }

    #[test]
    fn added_and_removed_properties() {
        let original = base().with_property(Property::text("CLASS", "PUBLIC"));
        let mutated = base().with_property(Property::text("TRANSP", "OPAQUE"));

        let delta = component_delta(&mutated, Some(&original));
        assert_eq!(
            delta.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["TRANSP", "CLASS"]
        );
        assert!(delta["TRANSP"].original.is_none());
        assert!(delta["CLASS"].mutated.is_none());
        assert!(!is_significant(&delta, &significant()));
    }

    #[test]
    fn multi_valued_count_and_value_changes() {
        let original = base();

        let mut fewer = base();
        fewer.properties.retain(|p| p.raw_value != "mailto:b@x");
        assert!(component_delta(&fewer, Some(&original)).contains_key("ATTENDEE"));

        let mut swapped = base();
        swapped.properties.retain(|p| p.raw_value != "mailto:b@x");
        swapped.add_property(attendee("mailto:c@x"));
        assert!(component_delta(&swapped, Some(&original)).contains_key("ATTENDEE"));

        let mut reordered = base();
        reordered.properties.retain(|p| p.name != "ATTENDEE");
        reordered.add_property(attendee("mailto:b@x"));
        reordered.add_property(attendee("mailto:a@x"));
        assert!(component_delta(&reordered, Some(&original)).is_empty());
    }

    #[test]
    fn multi_valued_check_is_per_original_occurrence() {
        // Same count, every original value present on the mutated side.
        let original = base()
            .with_property(Property::raw("EXDATE", "20240108T100000Z"))
            .with_property(Property::raw("EXDATE", "20240108T100000Z"));
        let mutated = base()
            .with_property(Property::raw("EXDATE", "20240108T100000Z"))
            .with_property(Property::raw("EXDATE", "20240115T100000Z"));

        assert!(component_delta(&mutated, Some(&original)).is_empty());
        assert!(touches_exdate(&component_delta(&original, Some(&mutated))));
    }

    #[test]
    fn attendee_delta_partitions_by_address() {
        let original = base();
        let mut mutated = base();
        mutated.properties.retain(|p| p.raw_value != "mailto:b@x");
        mutated.add_property(attendee("mailto:c@x").with_param(Parameter::cn("C")));

        let delta = attendee_delta(&mutated, Some(&original));
        assert_eq!(addresses(&delta.added), vec!["mailto:c@x"]);
        assert_eq!(addresses(&delta.removed), vec!["mailto:b@x"]);
        assert_eq!(addresses(&delta.extant), vec!["mailto:a@x"]);

        let mut union = addresses(&delta.added);
        union.extend(addresses(&delta.removed));
        union.extend(addresses(&delta.extant));
        union.sort();
        assert_eq!(union, vec!["mailto:a@x", "mailto:b@x", "mailto:c@x"]);
    }

    #[test]
    fn attendee_delta_without_original() {
        let mutated = base();
        let delta = attendee_delta(&mutated, None);
        assert_eq!(delta.added.len(), 2);
        assert!(delta.removed.is_empty());
        assert!(delta.extant.is_empty());
        assert!(!delta.is_empty());
        assert!(attendee_delta(&Component::event(), None).is_empty());
    }
}
