use kunai_core::config::SchedulingConfig;

use crate::error::ServiceResult;

/// iTIP scheduling broker.
///
/// Outbound, it turns an organizer's change to a calendar object into the
/// REQUEST and CANCEL messages attendees need. Inbound, it applies a CANCEL
/// to the attendee's copy. The broker holds configuration only; every call
/// works on the values passed in.
#[derive(Debug, Clone)]
pub struct TipBroker {
    pub(super) significant_properties: Vec<String>,
    pub(super) prodid: String,
}

impl TipBroker {
    /// ## Summary
    /// Creates a broker from validated scheduling settings.
    ///
    /// ## Errors
    /// Returns an error if the settings fail validation.
    pub fn new(config: SchedulingConfig) -> ServiceResult<Self> {
        let config = config.validate()?;
        Ok(Self {
            significant_properties: config.significant_properties,
            prodid: config.prodid,
        })
    }

    /// Property names whose change marks a message as significant.
    #[must_use]
    pub fn significant_properties(&self) -> &[String] {
        &self.significant_properties
    }
}

impl Default for TipBroker {
    fn default() -> Self {
        let config = SchedulingConfig::default();
        Self {
            significant_properties: config.significant_properties,
            prodid: config.prodid,
        }
    }
}
