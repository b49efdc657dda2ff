//! Run configuration.
use chrono::{Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What to do when a tournament report cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MalformedReportPolicy {
    /// Stop the whole run on the first unparsable report.
    #[default]
    Abort,
    /// Log the report and continue with the next one.
    Skip,
}

/// Errors raised when run configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("standard_format must not be empty")]
    EmptyFormat,
    #[error("recent_window_months must be between 1 and {max} (got {value})")]
    RecentWindow { value: u32, max: u32 },
    #[error("invalid configuration JSON: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// The only tournament format that is tabulated, compared
    /// case-insensitively.
    #[serde(default = "RunConfig::default_standard_format")]
    pub standard_format: String,
    /// Length of the "recent" lookback window.
    #[serde(default = "RunConfig::default_recent_window_months")]
    pub recent_window_months: u32,
    /// Reference date for the recent window; today when unset.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    #[serde(default)]
    pub on_malformed_report: MalformedReportPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            standard_format: Self::default_standard_format(),
            recent_window_months: Self::default_recent_window_months(),
            as_of: None,
            on_malformed_report: MalformedReportPolicy::default(),
        }
    }
}

impl RunConfig {
    const MAX_RECENT_WINDOW_MONTHS: u32 = 120;

    fn default_standard_format() -> String {
        "standard - 100 point dogfight".to_string()
    }

    const fn default_recent_window_months() -> u32 {
        4
    }

    /// Load configuration from a JSON document; absent fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.standard_format.trim().is_empty() {
            return Err(ConfigError::EmptyFormat);
        }
        if self.recent_window_months == 0
            || self.recent_window_months > Self::MAX_RECENT_WINDOW_MONTHS
        {
            return Err(ConfigError::RecentWindow {
                value: self.recent_window_months,
                max: Self::MAX_RECENT_WINDOW_MONTHS,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn reference_date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Earliest tournament date that still counts as recent.
    #[must_use]
    pub fn recent_since(&self) -> NaiveDate {
        self.reference_date()
            .checked_sub_months(Months::new(self.recent_window_months))
            .unwrap_or(NaiveDate::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_takes_defaults() {
        let cfg = RunConfig::from_json("{}").unwrap();
        assert_eq!(cfg, RunConfig::default());
        assert_eq!(cfg.recent_window_months, 4);
        assert_eq!(cfg.on_malformed_report, MalformedReportPolicy::Abort);
    }

    #[test]
    fn parses_every_field() {
        let cfg = RunConfig::from_json(
            r#"{
                "standard_format": "Standard - 100 Point Dogfight",
                "recent_window_months": 6,
                "as_of": "2016-06-30",
                "on_malformed_report": "skip"
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.recent_window_months, 6);
        assert_eq!(cfg.as_of, NaiveDate::from_ymd_opt(2016, 6, 30));
        assert_eq!(cfg.on_malformed_report, MalformedReportPolicy::Skip);
    }

    #[test]
    fn recent_cutoff_is_calendar_months_back() {
        let cfg = RunConfig {
            as_of: NaiveDate::from_ymd_opt(2016, 6, 30),
            ..RunConfig::default()
        };
        assert_eq!(cfg.recent_since(), NaiveDate::from_ymd_opt(2016, 2, 29).unwrap());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let cfg = RunConfig {
            recent_window_months: 0,
            ..RunConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::RecentWindow { value: 0, max: 120 })
        );
        assert_eq!(
            RunConfig::from_json(r#"{"standard_format": "  "}"#),
            Err(ConfigError::EmptyFormat)
        );
        assert!(matches!(
            RunConfig::from_json(r#"{"recent_window_months": "four"}"#),
            Err(ConfigError::Parse(_))
        ));
    }
}
