//! Outbound message assembly.

use kunai_rfc::rfc::ical::core::{Component, ICalendar, Property, names};
use kunai_rfc::rfc::itip::{CalendarUser, Message, Method};

use super::TipBroker;
use crate::error::{ServiceError, ServiceResult};

impl TipBroker {
    /// Returns `calendar` without METHOD and without its VEVENT, VTODO,
    /// VJOURNAL and VFREEBUSY components. VTIMEZONE children are kept.
    #[must_use]
    pub fn message_template(&self, calendar: &ICalendar) -> ICalendar {
        let mut root = Component::calendar();
        root.properties = calendar
            .root
            .properties
            .iter()
            .filter(|p| p.name != names::METHOD)
            .cloned()
            .collect();
        root.children = calendar
            .root
            .children
            .iter()
            .filter(|c| !c.is_calendar_object())
            .cloned()
            .collect();

        if root.get_property(names::VERSION).is_none() {
            root.add_property(Property::text(names::VERSION, "2.0"));
        }
        if root.get_property(names::PRODID).is_none() {
            root.add_property(Property::text(names::PRODID, self.prodid.as_str()));
        }

        ICalendar { root }
    }

    /// ## Summary
    /// Builds one message carrying `component` from `sender` to `recipient`.
    ///
    /// The payload is a copy of `template` with METHOD set to `method`.
    /// `component` is expected to be sanitized already.
    ///
    /// ## Errors
    /// Returns an error if the component has no UID, or if sender and
    /// recipient are the same calendar user.
    pub fn generate_message(
        method: Method,
        sender: &CalendarUser,
        recipient: CalendarUser,
        component: &Component,
        template: &ICalendar,
        significant_change: bool,
    ) -> ServiceResult<Message> {
        if sender.address == recipient.address {
            return Err(ServiceError::InvariantViolation(
                "scheduling message addressed to its sender",
            ));
        }
        let uid = component
            .uid()
            .ok_or(ServiceError::MissingProperty(names::UID))?
            .to_string();

        let mut payload = template.clone();
        payload
            .root
            .set_property(Property::text(names::METHOD, method.as_str()));
        payload.add_component(component.clone());

        tracing::trace!(
            %method,
            recipient = %recipient.address,
            significant_change,
            "Generated scheduling message"
        );

        Ok(Message {
            method,
            uid,
            component: component.component_kind(),
            sequence: component.sequence().unwrap_or(0),
            sender: sender.clone(),
            recipient,
            significant_change,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kunai_rfc::rfc::ical::core::ComponentKind;

    fn calendar() -> ICalendar {
        let mut ical = ICalendar::new("-//Test//Test//EN");
        ical.root
            .add_property(Property::text(names::METHOD, "PUBLISH"));
        ical.root.add_property(Property::text("CALSCALE", "GREGORIAN"));
        ical.add_component(Component::timezone());
        ical.add_component(
            Component::event()
                .with_property(Property::text("UID", "evt-1"))
                .with_property(Property::integer("SEQUENCE", 2)),
        );
        ical
    }

    fn user(address: &str) -> CalendarUser {
        CalendarUser::new(address, None)
    }

    #[test]
    fn template_drops_method_and_objects() {
        let template = TipBroker::default().message_template(&calendar());
        assert_eq!(template.method(), None);
        assert_eq!(template.prodid(), Some("-//Test//Test//EN"));
        assert!(template.components().is_empty());
        assert_eq!(template.timezones().len(), 1);
        assert!(template.root.get_property("CALSCALE").is_some());
    }

    #[test]
    fn template_fills_prodid() {
        let bare = ICalendar {
            root: Component::calendar(),
        };
        let template = TipBroker::default().message_template(&bare);
        assert_eq!(template.version(), Some("2.0"));
        assert_eq!(template.prodid(), Some(kunai_core::constants::PRODID));
    }

    #[test]
    fn message_carries_method_and_sequence() {
        let cal = calendar();
        let template = TipBroker::default().message_template(&cal);
        let event = cal.components()[0];

        let message = TipBroker::generate_message(
            Method::Cancel,
            &user("mailto:org@x"),
            user("mailto:a@x"),
            event,
            &template,
            true,
        )
        .expect("valid message");

        assert_eq!(message.method, Method::Cancel);
        assert_eq!(message.payload.method(), Some("CANCEL"));
        assert_eq!(message.uid, "evt-1");
        assert_eq!(message.component, ComponentKind::Event);
        assert_eq!(message.sequence, 2);
        assert_eq!(message.components().len(), 1);
        assert_eq!(message.payload.timezones().len(), 1);
    }

    #[test]
    fn message_to_self_is_rejected() {
        let cal = calendar();
        let result = TipBroker::generate_message(
            Method::Request,
            &user("mailto:org@x"),
            user("mailto:org@x"),
            cal.components()[0],
            &cal,
            false,
        );
        assert!(matches!(result, Err(ServiceError::InvariantViolation(_))));
    }

    #[test]
    fn message_without_uid_is_rejected() {
        let cal = calendar();
        let result = TipBroker::generate_message(
            Method::Request,
            &user("mailto:org@x"),
            user("mailto:a@x"),
            &Component::event(),
            &cal,
            false,
        );
        assert!(matches!(result, Err(ServiceError::MissingProperty("UID"))));
    }
}
