//! Timestamp parsing for bracketed log-line prefixes.
//!
//! The interpreter writes `[01-Jan-2024 00:00:00 UTC]`; other hosts
//! configure ISO-8601 variants. Anything unrecognized parses to `None`
//! rather than failing the line.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Parse the content of a bracketed timestamp prefix.
///
/// Supported formats, tried in order:
/// - `DD-Mon-YYYY HH:MM:SS <zone-name>` (the default error-log format;
///   the trailing zone name is accepted and the time taken as UTC)
/// - `DD-Mon-YYYY HH:MM:SS`
/// - RFC 3339 / ISO-8601 with offset or trailing `Z`
/// - `YYYY-MM-DDTHH:MM:SS` and `YYYY-MM-DD HH:MM:SS` without offset
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    // Default format, with or without the trailing zone name. Non-UTC
    // zone names are rare in practice and carry no parseable offset, so
    // the naive time is taken as UTC.
    if let Some((front, zone)) = text.rsplit_once(' ') {
        if zone.chars().all(|c| c.is_ascii_alphabetic()) && !zone.is_empty() {
            if let Ok(naive) = NaiveDateTime::parse_from_str(front, "%d-%b-%Y %H:%M:%S") {
                if zone != "UTC" {
                    log::debug!("taking zone {zone} as UTC in log timestamp");
                }
                return Some(Utc.from_utc_datetime(&naive));
            }
        }
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%d-%b-%Y %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    // ISO-8601 with an explicit offset.
    if let Ok(fixed) = DateTime::parse_from_rfc3339(text) {
        return Some(fixed.with_timezone(&Utc));
    }

    // ISO-8601 without offset.
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_default_error_log_format() {
        let ts = parse_timestamp("01-Jan-2024 00:00:00 UTC").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn parses_non_utc_zone_name_as_utc() {
        let ts = parse_timestamp("15-Feb-2023 12:30:45 CET").unwrap();
        assert_eq!(ts.hour(), 12);
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let ts = parse_timestamp("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-15T08:30:00+00:00");
    }

    #[test]
    fn parses_rfc3339_zulu() {
        let ts = parse_timestamp("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn parses_iso_without_offset() {
        assert!(parse_timestamp("2024-01-15T10:30:00").is_some());
        assert!(parse_timestamp("2024-01-15 10:30:00").is_some());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("proc_open fork failed").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("32-Jan-2024 00:00:00 UTC").is_none());
    }
}
