//! Per-instance projection of a calendar object used by the organizer diff.

use indexmap::{IndexMap, IndexSet};
use kunai_rfc::rfc::ical::core::{Component, ICalendar};
use kunai_rfc::rfc::itip::CalendarUser;

use crate::error::{ServiceError, ServiceResult};

/// What the broker knows about one attendee across the object's instances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendeeInfo {
    /// Display name from the first occurrence carrying CN.
    pub name: Option<String>,
    /// Instance ids the attendee is invited to.
    pub instances: IndexSet<String>,
}

/// Projection of one version of a calendar object.
///
/// An empty value stands for "no such version" (object created or deleted).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventInfo {
    pub uid: Option<String>,
    /// SEQUENCE of the base instance (or the first instance), default 0.
    pub sequence: i32,
    pub organizer: Option<CalendarUser>,
    /// Attendees keyed by calendar user address.
    pub attendees: IndexMap<String, AttendeeInfo>,
    /// Components keyed by instance id (`"master"` or RECURRENCE-ID).
    pub instances: IndexMap<String, Component>,
}

impl EventInfo {
    /// ## Summary
    /// Builds the projection of `calendar`.
    ///
    /// ## Errors
    /// Returns an error if components disagree on UID or kind, lack a UID,
    /// or two components share an instance id.
    pub fn from_calendar(calendar: &ICalendar) -> ServiceResult<Self> {
        let Some((uid, _)) = calendar.object_identity()? else {
            return Ok(Self::default());
        };

        let mut info = Self {
            uid: Some(uid.to_string()),
            ..Self::default()
        };

        for component in calendar.components() {
            let instance_id = component.instance_id();

            if info.organizer.is_none()
                && let Some(organizer) = component.organizer()
            {
                info.organizer = Some(CalendarUser::new(
                    organizer.raw_value(),
                    organizer.common_name().map(String::from),
                ));
            }

            for attendee in component.attendees() {
                let entry = info
                    .attendees
                    .entry(attendee.raw_value().to_string())
                    .or_default();
                if entry.name.is_none() {
                    entry.name = attendee.common_name().map(String::from);
                }
                entry.instances.insert(instance_id.clone());
            }

            if info
                .instances
                .insert(instance_id.clone(), component.clone())
                .is_some()
            {
                return Err(ServiceError::ValidationError(format!(
                    "duplicate instance {instance_id} in calendar object {uid}"
                )));
            }
        }

        info.sequence = calendar
            .base_component()
            .or_else(|| info.instances.values().next())
            .and_then(Component::sequence)
            .unwrap_or(0);

        tracing::trace!(
            uid,
            instances = info.instances.len(),
            attendees = info.attendees.len(),
            "Built event info"
        );
        Ok(info)
    }
}
