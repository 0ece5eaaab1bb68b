//! Shared utility functions for WQM crates.

/// Date utility functions
pub mod dates {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

    /// ISO calendar date: "YYYY-MM-DD"
    pub const YEAR_FORMAT: &str = "%Y-%m-%d";

    /// Date-time layouts accepted by [`parse_timestamp`], tried in order.
    /// Spreadsheets exported with a US locale write `M/D/YYYY H:MM:SS`.
    const DATE_TIME_FORMATS: [&str; 7] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];

    /// Date-only layouts accepted by [`parse_timestamp`].
    const DATE_FORMATS: [&str; 3] = [YEAR_FORMAT, "%Y/%m/%d", "%m/%d/%Y"];

    /// Parse a sample timestamp the way a spreadsheet cell may carry it.
    ///
    /// Accepts RFC 3339, ISO dates and date-times, `YYYY/MM/DD` and US
    /// `M/D/YYYY` dates with an optional time. Timestamps without an offset
    /// are taken as UTC; a bare date is midnight UTC. Returns `None` when no
    /// layout matches.
    pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        for format in DATE_TIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Some(naive.and_utc());
            }
        }
        DATE_FORMATS.iter().find_map(|format| {
            NaiveDate::parse_from_str(s, format)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
    }

}

/// Column-name and identifier matching.
///
/// Site identifiers and column names compare case-insensitively with
/// surrounding whitespace ignored.
pub mod keys {
    /// Canonical form of a key: trimmed and lowercased.
    pub fn normalize_key(key: &str) -> String {
        key.trim().to_lowercase()
    }

    /// True when two keys name the same column or site.
    pub fn same_key(a: &str, b: &str) -> bool {
        normalize_key(a) == normalize_key(b)
    }

}
