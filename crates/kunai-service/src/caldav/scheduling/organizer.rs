//! Organizer-side change detection.

use kunai_core::constants::MASTER_INSTANCE_ID;
use kunai_rfc::rfc::ical::core::{
    Component, ICalendar, Property, SCHEDULE_AGENT_SERVER, STATUS_CANCELLED, names, param_names,
};
use kunai_rfc::rfc::itip::{CalendarUser, Message, Method};

use super::delta::{attendee_delta, component_delta, is_significant, touches_exdate};
use super::exdate::exdate_delta;
use super::sanitize::sanitize_scheduling;
use super::{EventInfo, TipBroker};
use crate::error::{ServiceError, ServiceResult};

/// What happened to one instance between the two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InstanceAction {
    Altered,
    Cancelled,
}

impl TipBroker {
    /// ## Summary
    /// Computes the messages an organizer's change requires.
    ///
    /// `calendar` is the object the messages are built from: the new version,
    /// or the old one when the object was deleted. `event_info` and
    /// `old_event_info` project the new and old versions; either may be
    /// empty. An empty result means there is nothing to send.
    ///
    /// ## Errors
    /// Returns an error if a changed instance with recipients has no
    /// ORGANIZER on either version, or if a component to send lacks a UID.
    #[tracing::instrument(skip_all, fields(
        uid = ?event_info.uid.as_ref().or(old_event_info.uid.as_ref()),
        instances = event_info.instances.len(),
        old_instances = old_event_info.instances.len(),
    ))]
    pub fn parse_event_for_organizer(
        &self,
        calendar: &ICalendar,
        event_info: &EventInfo,
        old_event_info: &EventInfo,
    ) -> ServiceResult<Vec<Message>> {
        let template = self.message_template(calendar);

        // Deleted, or converted from attended to attendee-less.
        if event_info.attendees.is_empty() && !old_event_info.attendees.is_empty() {
            tracing::debug!(
                attendees = old_event_info.attendees.len(),
                "Object lost its attendees, cancelling for everyone"
            );
            let component = cancellation_for_previous_attendees(calendar, old_event_info)?;
            return Self::instance_cancelled_by_organizer(&component, &template);
        }

        let mut messages = Vec::new();
        for (instance_id, mutated) in &event_info.instances {
            if mutated.organizer().is_some_and(|o| !is_server_scheduled(o)) {
                tracing::debug!(instance = %instance_id, "Organizer schedules externally, skipping");
                continue;
            }

            let original = old_event_info.instances.get(instance_id);
            let action = if is_cancelled(mutated) {
                if original.is_some_and(is_cancelled) {
                    tracing::trace!(instance = %instance_id, "Instance already cancelled");
                    continue;
                }
                InstanceAction::Cancelled
            } else {
                InstanceAction::Altered
            };

            tracing::debug!(instance = %instance_id, ?action, "Processing instance");
            let instance_messages = match action {
                InstanceAction::Altered => {
                    self.instance_created_or_modified_by_organizer(mutated, original, &template)?
                }
                InstanceAction::Cancelled => {
                    Self::instance_cancelled_by_organizer(mutated, &template)?
                }
            };
            messages.extend(instance_messages);
        }

        tracing::debug!(count = messages.len(), "Computed organizer messages");
        Ok(messages)
    }

    /// ## Summary
    /// Computes the messages for one created or modified instance.
    ///
    /// Added and extant attendees get a REQUEST, removed attendees a CANCEL.
    /// Nothing is sent when no property changed.
    ///
    /// ## Errors
    /// Returns an error if there are recipients but no ORGANIZER on either
    /// version, or if the instance lacks a UID.
    pub fn instance_created_or_modified_by_organizer(
        &self,
        mutated: &Component,
        original: Option<&Component>,
        template: &ICalendar,
    ) -> ServiceResult<Vec<Message>> {
        let delta = component_delta(mutated, original);
        if delta.is_empty() {
            tracing::trace!("Instance unchanged");
            return Ok(Vec::new());
        }
        let significant = is_significant(&delta, &self.significant_properties);
        if touches_exdate(&delta) {
            let exdates = exdate_delta(mutated, original);
            tracing::debug!(
                added = ?exdates.added,
                removed = ?exdates.removed,
                "Excluded dates changed"
            );
        }

        let attendees = attendee_delta(mutated, original);
        if attendees.is_empty() {
            return Ok(Vec::new());
        }

        // An organizer dropping ORGANIZER turns the object into a
        // non-scheduling one; attendees still hear from the old organizer.
        let mut component = mutated.clone();
        if component.organizer().is_none()
            && let Some(organizer) = original.and_then(Component::organizer)
        {
            component.add_property(organizer.clone());
        }
        let sender = component
            .organizer()
            .map(calendar_user)
            .ok_or(ServiceError::MissingProperty(names::ORGANIZER))?;
        let component = sanitize_scheduling(component);

        let recipients = attendees
            .added
            .iter()
            .map(|a| (Method::Request, *a))
            .chain(attendees.removed.iter().map(|a| (Method::Cancel, *a)))
            .chain(attendees.extant.iter().map(|a| (Method::Request, *a)));

        let mut messages = Vec::new();
        for (method, attendee) in recipients {
            if !should_notify(&sender, attendee) {
                continue;
            }
            let method = forced_method(attendee).unwrap_or(method);
            messages.push(Self::generate_message(
                method,
                &sender,
                calendar_user(attendee),
                &component,
                template,
                significant,
            )?);
        }

        Ok(messages)
    }

    /// ## Summary
    /// Computes one CANCEL per attendee of `instance`.
    ///
    /// Returns no messages when the instance has no ORGANIZER or no
    /// ATTENDEE.
    ///
    /// ## Errors
    /// Returns an error if the instance lacks a UID.
    pub fn instance_cancelled_by_organizer(
        instance: &Component,
        template: &ICalendar,
    ) -> ServiceResult<Vec<Message>> {
        let Some(organizer) = instance.organizer() else {
            return Ok(Vec::new());
        };
        let attendees = instance.attendees();
        if attendees.is_empty() {
            return Ok(Vec::new());
        }

        let sender = calendar_user(organizer);
        let component = sanitize_scheduling(instance.clone());

        attendees
            .into_iter()
            .filter(|attendee| should_notify(&sender, attendee))
            .map(|attendee| {
                Self::generate_message(
                    Method::Cancel,
                    &sender,
                    calendar_user(attendee),
                    &component,
                    template,
                    true,
                )
            })
            .collect()
    }

    /// ## Summary
    /// Computes the messages for a change between two versions of a
    /// calendar object. `None` stands for "did not exist".
    ///
    /// Objects without an ORGANIZER on either version are not scheduling
    /// objects and produce no messages.
    ///
    /// ## Errors
    /// Returns an error if either version is not a valid calendar object,
    /// the versions carry different UIDs, or message generation fails.
    pub fn schedule_organizer_change(
        &self,
        calendar: Option<&ICalendar>,
        old_calendar: Option<&ICalendar>,
    ) -> ServiceResult<Vec<Message>> {
        let event_info = calendar
            .map(EventInfo::from_calendar)
            .transpose()?
            .unwrap_or_default();
        let old_event_info = old_calendar
            .map(EventInfo::from_calendar)
            .transpose()?
            .unwrap_or_default();

        if let (Some(uid), Some(old_uid)) = (&event_info.uid, &old_event_info.uid)
            && uid != old_uid
        {
            return Err(ServiceError::ValidationError(format!(
                "UID changed from {old_uid} to {uid}"
            )));
        }
        if event_info.organizer.is_none() && old_event_info.organizer.is_none() {
            tracing::debug!("Not a scheduling object");
            return Ok(Vec::new());
        }
        let Some(subject) = calendar.or(old_calendar) else {
            return Ok(Vec::new());
        };
        // A deleted object is described by its last version.
        let subject = if event_info.instances.is_empty() {
            old_calendar.unwrap_or(subject)
        } else {
            subject
        };

        self.parse_event_for_organizer(subject, &event_info, &old_event_info)
    }
}

/// Builds the single component that cancels the object for every attendee
/// any old instance knew about.
fn cancellation_for_previous_attendees(
    calendar: &ICalendar,
    old_event_info: &EventInfo,
) -> ServiceResult<Component> {
    let mut component = calendar
        .base_component()
        .or_else(|| old_event_info.instances.get(MASTER_INSTANCE_ID))
        .or_else(|| old_event_info.instances.values().next())
        .cloned()
        .ok_or(ServiceError::InvariantViolation(
            "attendees known without any instance",
        ))?;

    component.remove_properties(names::ATTENDEE);
    if component.organizer().is_none()
        && let Some(organizer) = old_event_info
            .instances
            .get(MASTER_INSTANCE_ID)
            .and_then(Component::organizer)
            .or_else(|| {
                old_event_info
                    .instances
                    .values()
                    .find_map(Component::organizer)
            })
    {
        component.add_property(organizer.clone());
    }

    let mut seen: Vec<&str> = Vec::new();
    for instance in old_event_info.instances.values() {
        for attendee in instance.attendees() {
            if !seen.contains(&attendee.raw_value()) {
                seen.push(attendee.raw_value());
                component.add_property(attendee.clone());
            }
        }
    }

    Ok(component)
}

fn is_cancelled(component: &Component) -> bool {
    component
        .status()
        .is_some_and(|s| s.eq_ignore_ascii_case(STATUS_CANCELLED))
}

/// Whether the server delivers messages for this ORGANIZER or ATTENDEE.
fn is_server_scheduled(prop: &Property) -> bool {
    prop.get_param(param_names::SCHEDULE_AGENT)
        .is_none_or(|agent| agent.has_value(SCHEDULE_AGENT_SERVER))
}

fn should_notify(sender: &CalendarUser, attendee: &Property) -> bool {
    if attendee.raw_value() == sender.address {
        return false;
    }
    if !is_server_scheduled(attendee) {
        tracing::debug!(attendee = %attendee.raw_value(), "Attendee schedules externally, skipping");
        return false;
    }
    true
}

fn forced_method(attendee: &Property) -> Option<Method> {
    let value = attendee.get_param_value(param_names::SCHEDULE_FORCE_SEND)?;
    match value.parse::<Method>() {
        Ok(method) => Some(method),
        Err(e) => {
            tracing::warn!(attendee = %attendee.raw_value(), error = %e, "Ignoring SCHEDULE-FORCE-SEND");
            None
        }
    }
}

fn calendar_user(prop: &Property) -> CalendarUser {
    CalendarUser::new(prop.raw_value(), prop.common_name().map(String::from))
}
