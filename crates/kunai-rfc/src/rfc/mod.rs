pub mod ical;
pub mod itip;
