//! Health classification of a site from its most recent valid sample.
//!
//! The classifier never fails: missing columns, unparseable dates, stale
//! samples and missing or non-numeric counts all degrade to
//! [`HealthStatus::Unknown`].

use crate::join::{JoinedDataset, KeyedRow};
use chrono::{DateTime, TimeDelta, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column holding the sampling date.
pub const DATE_COLUMN: &str = "fecha";

/// Column holding the bacterial count (enterococci per 100 ml).
pub const COUNT_COLUMN: &str = "enterococos";

/// Samples older than this many days no longer describe a site.
pub const STALENESS_DAYS_DEFAULT: i64 = 15;

/// Inclusive upper bound of a `good` count.
pub const GOOD_THRESHOLD_DEFAULT: f64 = 99.0;

/// Inclusive upper bound of a `caution` count.
pub const CAUTION_THRESHOLD_DEFAULT: f64 = 199.0;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Unknown,
    Good,
    Caution,
    Unhealthy,
}

impl HealthStatus {
    pub const ALL: [HealthStatus; 4] = [
        HealthStatus::Unknown,
        HealthStatus::Good,
        HealthStatus::Caution,
        HealthStatus::Unhealthy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Unknown => "unknown",
            HealthStatus::Good => "good",
            HealthStatus::Caution => "caution",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive upper bounds on the bacterial count.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Thresholds {
    pub good: f64,
    pub caution: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            good: GOOD_THRESHOLD_DEFAULT,
            caution: CAUTION_THRESHOLD_DEFAULT,
        }
    }
}

impl Thresholds {
    /// Rate a count: `<= good` is good, `<= caution` is caution, anything
    /// above is unhealthy.
    pub fn rate(&self, count: f64) -> HealthStatus {
        if count <= self.good {
            HealthStatus::Good
        } else if count <= self.caution {
            HealthStatus::Caution
        } else {
            HealthStatus::Unhealthy
        }
    }
}

/// Classification settings: which columns to read, how old a sample may
/// be and where the count thresholds sit.
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
    pub date_column: String,
    pub count_column: String,
    pub staleness: TimeDelta,
    pub thresholds: Thresholds,
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier {
            date_column: DATE_COLUMN.to_string(),
            count_column: COUNT_COLUMN.to_string(),
            staleness: TimeDelta::days(STALENESS_DAYS_DEFAULT),
            thresholds: Thresholds::default(),
        }
    }
}

impl Classifier {
    /// The row with the latest parseable date. Ties keep the first row seen.
    fn newest_row<'a>(&self, dataset: &'a JoinedDataset) -> Option<(DateTime<Utc>, KeyedRow<'a>)> {
        let mut newest: Option<(DateTime<Utc>, KeyedRow<'a>)> = None;
        for row in dataset.keyed_rows() {
            let Some(taken) = row.get(&self.date_column).and_then(|v| v.as_timestamp()) else {
                continue;
            };
            if newest.as_ref().map_or(true, |(best, _)| taken > *best) {
                newest = Some((taken, row));
            }
        }
        newest
    }

    pub fn classify(&self, dataset: &JoinedDataset, now: DateTime<Utc>) -> HealthStatus {
        if dataset.column_index(&self.date_column).is_none() {
            debug!("No `{}` column, status unknown", self.date_column);
            return HealthStatus::Unknown;
        }
        let Some((taken, row)) = self.newest_row(dataset) else {
            return HealthStatus::Unknown;
        };
        // An overflowing window reaches back past any representable sample.
        if let Some(cutoff) = now.checked_sub_signed(self.staleness) {
            if taken < cutoff {
                debug!("Newest sample {} is older than {}", taken, cutoff);
                return HealthStatus::Unknown;
            }
        }
        match row.get(&self.count_column).and_then(|v| v.as_f64()) {
            Some(count) if count.is_finite() => self.thresholds.rate(count),
            _ => HealthStatus::Unknown,
        }
    }
}

/// Classify with the default date and count columns.
pub fn classify(
    dataset: &JoinedDataset,
    now: DateTime<Utc>,
    staleness: TimeDelta,
    thresholds: Thresholds,
) -> HealthStatus {
    Classifier {
        staleness,
        thresholds,
        ..Classifier::default()
    }
    .classify(dataset, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::join;
    use crate::record::{Record, Value};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 25, 12, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> String {
        (now() - TimeDelta::days(days)).to_rfc3339()
    }

    fn sample(site: &str, date: &str, count: Value) -> Record {
        Record::new()
            .with("sitio", Value::Text(site.into()))
            .with("fecha", Value::Text(date.into()))
            .with("enterococos", count)
    }

    fn columns() -> Vec<String> {
        vec!["fecha".to_string(), "enterococos".to_string()]
    }

    fn status_of(rows: &[Record], site: &str) -> HealthStatus {
        classify(
            &join(rows, site, &columns()),
            now(),
            TimeDelta::days(15),
            Thresholds::default(),
        )
    }

    #[test]
    fn test_threshold_boundaries() {
        let cases = [
            (0.0, HealthStatus::Good),
            (99.0, HealthStatus::Good),
            (100.0, HealthStatus::Caution),
            (199.0, HealthStatus::Caution),
            (200.0, HealthStatus::Unhealthy),
        ];
        for (count, expected) in cases {
            let rows = vec![sample("A", &days_ago(1), Value::Number(count))];
            assert_eq!(status_of(&rows, "A"), expected, "count {count}");
        }
    }

    #[test]
    fn test_newest_sample_wins() {
        let rows = vec![
            sample("A", &days_ago(20), Value::Number(50.0)),
            sample("A", &days_ago(1), Value::Number(150.0)),
        ];
        assert_eq!(status_of(&rows, "A"), HealthStatus::Caution);
    }

    #[test]
    fn test_newest_sample_wins_regardless_of_order() {
        let rows = vec![
            sample("A", &days_ago(2), Value::Text("250".into())),
            sample("A", &days_ago(5), Value::Text("10".into())),
        ];
        assert_eq!(status_of(&rows, "A"), HealthStatus::Unhealthy);
    }

    #[test]
    fn test_tie_keeps_first_row() {
        let date = days_ago(3);
        let rows = vec![
            sample("A", &date, Value::Number(10.0)),
            sample("A", &date, Value::Number(500.0)),
        ];
        assert_eq!(status_of(&rows, "A"), HealthStatus::Good);
    }

    #[test]
    fn test_unparseable_date_is_unknown() {
        let rows = vec![sample("B", "last tuesday", Value::Number(10.0))];
        assert_eq!(status_of(&rows, "B"), HealthStatus::Unknown);
    }

    #[test]
    fn test_unparseable_rows_are_ignored() {
        let rows = vec![
            sample("A", "pending", Value::Number(500.0)),
            sample("A", &days_ago(4), Value::Number(20.0)),
        ];
        assert_eq!(status_of(&rows, "A"), HealthStatus::Good);
    }

    #[test]
    fn test_stale_sample_is_unknown() {
        let rows = vec![sample("A", &days_ago(16), Value::Number(10.0))];
        assert_eq!(status_of(&rows, "A"), HealthStatus::Unknown);
    }

    #[test]
    fn test_sample_at_window_edge_is_current() {
        let rows = vec![sample("A", &days_ago(15), Value::Number(10.0))];
        assert_eq!(status_of(&rows, "A"), HealthStatus::Good);
    }

    #[test]
    fn test_missing_date_column_is_unknown() {
        let rows = vec![sample("A", &days_ago(1), Value::Number(10.0))];
        let dataset = join(&rows, "A", &["enterococos".to_string()]);
        let status = classify(&dataset, now(), TimeDelta::days(15), Thresholds::default());
        assert_eq!(status, HealthStatus::Unknown);
    }

    #[test]
    fn test_missing_count_column_is_unknown() {
        let rows = vec![sample("A", &days_ago(1), Value::Number(10.0))];
        let dataset = join(&rows, "A", &["fecha".to_string()]);
        let status = classify(&dataset, now(), TimeDelta::days(15), Thresholds::default());
        assert_eq!(status, HealthStatus::Unknown);
    }

    #[test]
    fn test_null_or_non_numeric_count_is_unknown() {
        let rows = vec![sample("A", &days_ago(1), Value::Null)];
        assert_eq!(status_of(&rows, "A"), HealthStatus::Unknown);
        // The newest row decides even when an older row has a count.
        let rows = vec![
            sample("A", &days_ago(3), Value::Number(10.0)),
            sample("A", &days_ago(1), Value::Text("lab pending".into())),
        ];
        assert_eq!(status_of(&rows, "A"), HealthStatus::Unknown);
        let rows = vec![sample("A", &days_ago(1), Value::Text("inf".into()))];
        assert_eq!(status_of(&rows, "A"), HealthStatus::Unknown);
    }

    #[test]
    fn test_no_rows_is_unknown() {
        assert_eq!(status_of(&[], "A"), HealthStatus::Unknown);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let rows = vec![
            sample("A", &days_ago(20), Value::Number(50.0)),
            sample("A", &days_ago(1), Value::Number(150.0)),
        ];
        let dataset = join(&rows, "A", &columns());
        let first = classify(&dataset, now(), TimeDelta::days(15), Thresholds::default());
        let second = classify(&dataset, now(), TimeDelta::days(15), Thresholds::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_columns() {
        let rows = vec![Record::new()
            .with("sitio", Value::Text("A".into()))
            .with("Date", Value::Text("5/24/2024".into()))
            .with("Enterococcus", Value::Number(120.0))];
        let dataset = join(&rows, "A", &["date".to_string(), "enterococcus".to_string()]);
        let classifier = Classifier {
            date_column: "date".into(),
            count_column: "enterococcus".into(),
            ..Classifier::default()
        };
        assert_eq!(classifier.classify(&dataset, now()), HealthStatus::Caution);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(HealthStatus::Unhealthy.to_string(), "unhealthy");
        assert_eq!(
            serde_json::to_string(&HealthStatus::Caution).unwrap(),
            "\"caution\""
        );
    }
}
