use kunai_rfc::rfc::ical::core::{
    Component, PARTSTAT_NEEDS_ACTION, Parameter, Property, names, param_names,
};

/// ## Summary
/// Prepares a component for embedding in an outbound message.
///
/// Drops SCHEDULE-FORCE-SEND and SCHEDULE-STATUS from ORGANIZER and every
/// ATTENDEE, gives attendees without PARTSTAT `NEEDS-ACTION`, and adds
/// `SEQUENCE:0` when SEQUENCE is missing (RFC 5545 §3.8.7.4).
///
/// Takes the caller's copy by value and returns it.
#[must_use]
pub fn sanitize_scheduling(mut component: Component) -> Component {
    if let Some(organizer) = component.get_property_mut(names::ORGANIZER) {
        organizer.remove_param(param_names::SCHEDULE_FORCE_SEND);
        organizer.remove_param(param_names::SCHEDULE_STATUS);
    }

    for attendee in component.get_properties_mut(names::ATTENDEE) {
        attendee.remove_param(param_names::SCHEDULE_FORCE_SEND);
        attendee.remove_param(param_names::SCHEDULE_STATUS);
        if !attendee.has_param(param_names::PARTSTAT) {
            attendee.add_param(Parameter::partstat(PARTSTAT_NEEDS_ACTION));
        }
    }

    if component.get_property(names::SEQUENCE).is_none() {
        component.add_property(Property::integer(names::SEQUENCE, 0));
    }

    component
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheduling_parameters_and_fills_defaults() {
        let component = Component::event()
            .with_property(Property::text("UID", "evt-1"))
            .with_property(
                Property::cal_address("ORGANIZER", "mailto:org@x")
                    .with_param(Parameter::cn("Org"))
                    .with_param(Parameter::schedule_status("1.2")),
            )
            .with_property(
                Property::cal_address("ATTENDEE", "mailto:a@x")
                    .with_param(Parameter::schedule_force_send("REQUEST")),
            )
            .with_property(
                Property::cal_address("ATTENDEE", "mailto:b@x")
                    .with_param(Parameter::partstat("ACCEPTED")),
            );

        let sanitized = sanitize_scheduling(component);

        let organizer = sanitized.organizer().expect("organizer kept");
        assert_eq!(organizer.common_name(), Some("Org"));
        assert!(!organizer.has_param(param_names::SCHEDULE_STATUS));

        let attendees = sanitized.attendees();
        assert!(!attendees[0].has_param(param_names::SCHEDULE_FORCE_SEND));
        assert_eq!(
            attendees[0].get_param_value(param_names::PARTSTAT),
            Some(PARTSTAT_NEEDS_ACTION)
        );
        assert_eq!(
            attendees[1].get_param_value(param_names::PARTSTAT),
            Some("ACCEPTED")
        );
        assert_eq!(sanitized.sequence(), Some(0));
    }

    #[test]
    fn keeps_existing_sequence() {
        let component = Component::event().with_property(Property::integer("SEQUENCE", 4));
        let sanitized = sanitize_scheduling(component);
        assert_eq!(sanitized.get_properties(names::SEQUENCE).len(), 1);
        assert_eq!(sanitized.sequence(), Some(4));
    }
}
