//! Excluded-date differences between two versions of a recurring component.

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc,
};
use chrono_tz::Tz;
use kunai_rfc::rfc::ical::core::{Component, Property, names, param_names};

/// EXDATE instants split by how they changed, as RFC 3339 UTC strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExdateDelta {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub extant: Vec<String>,
}

/// ## Summary
/// Compares the EXDATE instants of `mutated` and `original`.
///
/// Entries are normalized to UTC first, so the same instant written with a
/// different TZID or as UTC compares equal. Entries that cannot be read are
/// skipped.
#[must_use]
pub fn exdate_delta(mutated: &Component, original: Option<&Component>) -> ExdateDelta {
    let mutated_dates = excluded_instants(mutated);
    let original_dates = original.map(excluded_instants).unwrap_or_default();

    let (extant, added) = mutated_dates
        .iter()
        .cloned()
        .partition(|d| original_dates.contains(d));
    let removed = original_dates
        .iter()
        .filter(|d| !mutated_dates.contains(d))
        .cloned()
        .collect();

    ExdateDelta {
        added,
        removed,
        extant,
    }
}

fn excluded_instants(component: &Component) -> Vec<String> {
    component
        .get_properties(names::EXDATE)
        .into_iter()
        .flat_map(property_instants)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .collect()
}

fn property_instants(prop: &Property) -> Vec<DateTime<Utc>> {
    let is_date = prop
        .get_param_value(param_names::VALUE)
        .is_some_and(|v| v.eq_ignore_ascii_case("DATE"));
    let tz = prop.get_param_value(param_names::TZID).and_then(|tzid| {
        let parsed = tzid.parse::<Tz>().ok();
        if parsed.is_none() {
            // TZIDs defined only by a VTIMEZONE in the object land here too.
            tracing::warn!(tzid, "TZID is not an IANA zone, reading EXDATE as UTC");
        }
        parsed
    });

    prop.raw_value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let instant = parse_instant(entry, is_date, tz);
            if instant.is_none() {
                tracing::warn!(entry, "Unreadable EXDATE entry skipped");
            }
            instant
        })
        .collect()
}

fn parse_instant(entry: &str, is_date: bool, tz: Option<Tz>) -> Option<DateTime<Utc>> {
    if is_date || entry.len() == 8 {
        let date = NaiveDate::parse_from_str(entry, "%Y%m%d").ok()?;
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    if let Some(utc) = entry.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S").ok()?;
        return Some(Utc.from_utc_datetime(&naive));
    }
    let naive = NaiveDateTime::parse_from_str(entry, "%Y%m%dT%H%M%S").ok()?;
    match tz {
        Some(tz) => local_to_utc(naive, tz),
        None => Some(Utc.from_utc_datetime(&naive)),
    }
}

/// Resolves a local time in `tz`. A time in a DST fold takes its first
/// occurrence; a time in a DST gap is shifted forward by one hour.
fn local_to_utc(local: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.with_timezone(&Utc)),
        LocalResult::None => {
            tracing::debug!(%local, %tz, "EXDATE falls in a DST gap, shifting forward");
            let shifted = local + Duration::hours(1);
            tz.from_local_datetime(&shifted)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
        }
    }
}
