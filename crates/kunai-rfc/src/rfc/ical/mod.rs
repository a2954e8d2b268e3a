//! iCalendar (RFC 5545) in-memory model.
//!
//! Text parsing and serialization live outside this crate; callers hand in
//! already-built components.

pub mod core;
