/// Product identity shared across crates
pub const PRODUCT_NAME: &str = "Kunai";
pub const PRODID: &str = const_str::concat!("-//", PRODUCT_NAME, "//", PRODUCT_NAME, " Scheduling//EN");

/// Instance id of the component carrying no RECURRENCE-ID.
pub const MASTER_INSTANCE_ID: &str = "master";

/// Properties whose modification warrants re-notifying attendees.
pub const SIGNIFICANT_CHANGE_PROPERTIES: &[&str] = &[
    "DTSTART",
    "DTEND",
    "DURATION",
    "DUE",
    "RRULE",
    "RDATE",
    "EXDATE",
    "STATUS",
    "SUMMARY",
    "DESCRIPTION",
    "LOCATION",
];

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "KUNAI";
