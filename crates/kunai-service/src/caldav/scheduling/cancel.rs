use indexmap::IndexMap;
use kunai_rfc::rfc::ical::core::{Component, ICalendar, Property, STATUS_CANCELLED, names};
use kunai_rfc::rfc::itip::{Message, Method};

use super::TipBroker;

impl TipBroker {
    /// ## Summary
    /// Applies an inbound CANCEL to the attendee's copy of the object.
    ///
    /// Matching instances get `STATUS:CANCELLED` and the message's SEQUENCE.
    /// Instances the copy does not have yet are appended with the same
    /// STATUS and SEQUENCE, otherwise as sent.
    /// Returns `None` when there is no existing object. A message with any
    /// other method leaves the object as it is.
    #[tracing::instrument(skip_all, fields(uid = %message.uid, sequence = message.sequence))]
    #[must_use]
    #[expect(clippy::unused_self)]
    pub fn apply_cancel(
        &self,
        message: &Message,
        existing: Option<ICalendar>,
    ) -> Option<ICalendar> {
        let mut existing = existing?;
        if message.method != Method::Cancel {
            tracing::warn!(method = %message.method, "Not a CANCEL message, leaving object unchanged");
            return Some(existing);
        }

        let mut pending: IndexMap<String, &Component> = message
            .components()
            .into_iter()
            .map(|c| (c.instance_id(), c))
            .collect();

        for component in existing.components_mut() {
            let instance_id = component.instance_id();
            if pending.shift_remove(&instance_id).is_none() {
                continue;
            }
            tracing::debug!(instance = %instance_id, "Cancelling instance");
            mark_cancelled(component, message.sequence);
        }

        // Appended overrides are marked too, so a repeated CANCEL is a no-op.
        for (instance_id, component) in pending {
            tracing::debug!(instance = %instance_id, "Adding cancelled override");
            let mut component = component.clone();
            mark_cancelled(&mut component, message.sequence);
            existing.add_component(component);
        }

        Some(existing)
    }
}

fn mark_cancelled(component: &mut Component, sequence: i32) {
    component.set_property(Property::text(names::STATUS, STATUS_CANCELLED));
    component.set_property(Property::integer(names::SEQUENCE, sequence));
}
