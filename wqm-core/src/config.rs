use crate::{
    error::{Result, WqmError},
    health::{
        Classifier, Thresholds, CAUTION_THRESHOLD_DEFAULT, COUNT_COLUMN, DATE_COLUMN,
        GOOD_THRESHOLD_DEFAULT, STALENESS_DAYS_DEFAULT,
    },
    join::SAMPLE_SITE_FIELD,
    site::SITE_FIELD,
};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Settings for turning the site and sample streams into markers.
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```json
/// { "staleness_days": 30, "good_threshold": 35 }
/// ```
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site identifier column of the site stream
    pub site_field: String,
    /// Site identifier column of the sample stream
    pub sample_site_field: String,
    pub date_column: String,
    pub count_column: String,
    pub staleness_days: i64,
    pub good_threshold: f64,
    pub caution_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            site_field: SITE_FIELD.to_string(),
            sample_site_field: SAMPLE_SITE_FIELD.to_string(),
            date_column: DATE_COLUMN.to_string(),
            count_column: COUNT_COLUMN.to_string(),
            staleness_days: STALENESS_DAYS_DEFAULT,
            good_threshold: GOOD_THRESHOLD_DEFAULT,
            caution_threshold: CAUTION_THRESHOLD_DEFAULT,
        }
    }
}

impl Config {
    pub fn from_json(json_object: &str) -> Result<Config> {
        let config: Config = serde_json::from_str(json_object)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.staleness_days <= 0 {
            return Err(WqmError::InvalidConfig(format!(
                "staleness_days must be positive, got {}",
                self.staleness_days
            )));
        }
        if !self.good_threshold.is_finite() || !self.caution_threshold.is_finite() {
            return Err(WqmError::InvalidConfig("thresholds must be finite".into()));
        }
        if self.good_threshold > self.caution_threshold {
            return Err(WqmError::InvalidConfig(format!(
                "good_threshold {} exceeds caution_threshold {}",
                self.good_threshold, self.caution_threshold
            )));
        }
        for (key, value) in [
            ("site_field", &self.site_field),
            ("sample_site_field", &self.sample_site_field),
            ("date_column", &self.date_column),
            ("count_column", &self.count_column),
        ] {
            if value.trim().is_empty() {
                return Err(WqmError::InvalidConfig(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }

    pub fn staleness(&self) -> TimeDelta {
        TimeDelta::try_days(self.staleness_days).unwrap_or(TimeDelta::MAX)
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            good: self.good_threshold,
            caution: self.caution_threshold,
        }
    }

    pub fn classifier(&self) -> Classifier {
        Classifier {
            date_column: self.date_column.clone(),
            count_column: self.count_column.clone(),
            staleness: self.staleness(),
            thresholds: self.thresholds(),
        }
    }
}
