//! iCalendar core models (RFC 5545).
//!
//! These types keep properties and parameters in order of appearance so a
//! component handed back to a serializer reads the way it came in. Equality
//! checks in the scheduling engine go through the raw (serialized) value.

mod component;
mod parameter;
mod property;
mod value;

pub use component::{Component, ComponentKind, ICalendar};
pub use parameter::{
    PARTSTAT_NEEDS_ACTION, Parameter, SCHEDULE_AGENT_SERVER, names as param_names,
};
pub use property::{
    Property, PropertySlot, SINGLETON_PROPERTIES, STATUS_CANCELLED, is_singleton_property, names,
};
pub use value::Value;
