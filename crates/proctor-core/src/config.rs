//! Engine configuration.
//!
//! Loaded from TOML (an explicit path, or `$XDG_CONFIG_HOME/proctor/config.toml`
//! when present) with environment overrides for collaborator credentials.
//! Every field has a default, so an empty file is a valid configuration.

use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use jiff::{civil::Time, tz::TimeZone, SignedDuration};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ProctorError, Result},
    models::MAX_REMINDERS,
};

/// Top-level configuration consumed by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// IANA zone name used to place day buckets; system zone when unset
    pub timezone: Option<String>,
    pub reminders: ReminderConfig,
    pub planning: PlanningConfig,
    pub collaborator: CollaboratorConfig,
}

/// Retry and suppression policy of the reminder scheduler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReminderConfig {
    /// Minimum gap between two reminders for the same block
    pub renotify_interval_minutes: u32,
    /// Reminders per block before it is marked overdue (1..=3)
    pub max_reminders: u8,
    /// Extra wait after a block's end before the first reminder
    pub grace_minutes: u32,
    /// How often `watch` calls `tick`
    pub poll_interval_seconds: u64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            renotify_interval_minutes: 15,
            max_reminders: MAX_REMINDERS,
            grace_minutes: 0,
            poll_interval_seconds: 30,
        }
    }
}

impl ReminderConfig {
    pub fn renotify_interval(&self) -> SignedDuration {
        SignedDuration::from_mins(i64::from(self.renotify_interval_minutes))
    }

    pub fn grace(&self) -> SignedDuration {
        SignedDuration::from_mins(i64::from(self.grace_minutes))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }
}

/// Daily time slot used by the fallback breakdown, as `HH:MM`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotConfig {
    pub start: String,
    pub end: String,
}

impl SlotConfig {
    /// Parses both ends of the slot.
    pub fn times(&self) -> Result<(Time, Time)> {
        let start = parse_clock(&self.start)?;
        let end = parse_clock(&self.end)?;
        if end <= start {
            return Err(ProctorError::configuration(format!(
                "Slot {}-{} ends before it starts",
                self.start, self.end
            )));
        }
        Ok((start, end))
    }
}

/// Horizon and fallback cadence of the planner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlanningConfig {
    /// Number of day buckets in a new plan
    pub horizon_days: u16,
    /// Slots the fallback template schedules on every day
    pub slots: Vec<SlotConfig>,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            horizon_days: 7,
            slots: vec![SlotConfig {
                start: "20:00".to_string(),
                end: "21:00".to_string(),
            }],
        }
    }
}

/// Endpoint, credentials and timeouts for the OpenAI-compatible
/// collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CollaboratorConfig {
    pub base_url: String,
    /// Empty selects the offline collaborator
    pub api_key: String,
    pub model: String,
    pub grade_timeout_seconds: u64,
    pub plan_timeout_seconds: u64,
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            grade_timeout_seconds: 45,
            plan_timeout_seconds: 60,
        }
    }
}

impl CollaboratorConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.base_url.trim().is_empty()
    }

    pub fn grade_timeout(&self) -> Duration {
        Duration::from_secs(self.grade_timeout_seconds)
    }

    pub fn plan_timeout(&self) -> Duration {
        Duration::from_secs(self.plan_timeout_seconds)
    }
}

impl Config {
    /// Loads the configuration from `path`, or from the XDG location when
    /// `path` is `None`, then applies environment overrides and validates.
    ///
    /// A missing XDG file yields the defaults; a missing explicit path is an
    /// error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML file without applying overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ProctorError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&raw)
    }

    /// Parses TOML text without applying overrides.
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw)
            .map_err(|e| ProctorError::configuration(format!("Invalid config file: {e}")))
    }

    fn default_path() -> Option<PathBuf> {
        xdg::BaseDirectories::with_prefix("proctor").find_config_file("config.toml")
    }

    /// `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `OPENAI_MODEL` fill in values the
    /// file left empty.
    fn apply_env(&mut self) {
        let collaborator = &mut self.collaborator;
        if collaborator.api_key.trim().is_empty() {
            if let Ok(key) = env::var("OPENAI_API_KEY") {
                collaborator.api_key = key.trim().to_string();
            }
        }
        if let Ok(url) = env::var("OPENAI_BASE_URL") {
            if !url.trim().is_empty() {
                collaborator.base_url = url.trim().to_string();
            }
        }
        if let Ok(model) = env::var("OPENAI_MODEL") {
            if !model.trim().is_empty() {
                collaborator.model = model.trim().to_string();
            }
        }
    }

    /// Checks ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let reminders = &self.reminders;
        if reminders.max_reminders == 0 || reminders.max_reminders > MAX_REMINDERS {
            return Err(ProctorError::configuration(format!(
                "reminders.max_reminders must be between 1 and {MAX_REMINDERS}, got {}",
                reminders.max_reminders
            )));
        }
        if reminders.renotify_interval_minutes == 0 {
            return Err(ProctorError::configuration(
                "reminders.renotify_interval_minutes must be positive",
            ));
        }
        if reminders.poll_interval_seconds == 0 {
            return Err(ProctorError::configuration(
                "reminders.poll_interval_seconds must be positive",
            ));
        }
        if self.planning.horizon_days == 0 {
            return Err(ProctorError::configuration(
                "planning.horizon_days must be positive",
            ));
        }
        if self.planning.slots.is_empty() {
            return Err(ProctorError::configuration(
                "planning.slots needs at least one slot",
            ));
        }
        for slot in &self.planning.slots {
            slot.times()?;
        }
        let collaborator = &self.collaborator;
        if collaborator.grade_timeout_seconds == 0 || collaborator.plan_timeout_seconds == 0 {
            return Err(ProctorError::configuration(
                "collaborator timeouts must be positive",
            ));
        }
        self.time_zone()?;
        Ok(())
    }

    /// Resolves the configured zone.
    pub fn time_zone(&self) -> Result<TimeZone> {
        match &self.timezone {
            Some(name) => TimeZone::get(name).map_err(|e| {
                ProctorError::configuration(format!("Unknown time zone '{name}': {e}"))
            }),
            None => Ok(TimeZone::system()),
        }
    }
}

/// Parses `HH:MM` (24-hour clock).
pub fn parse_clock(value: &str) -> Result<Time> {
    let invalid = || ProctorError::invalid_input("time", format!("Expected HH:MM, got '{value}'"));
    let (hour, minute) = value.trim().split_once(':').ok_or_else(invalid)?;
    let hour: i8 = hour.parse().map_err(|_| invalid())?;
    let minute: i8 = minute.parse().map_err(|_| invalid())?;
    Time::new(hour, minute, 0, 0).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use jiff::civil::time;

    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.reminders.max_reminders, 3);
        assert_eq!(config.planning.horizon_days, 7);
        assert_eq!(config.reminders.renotify_interval(), SignedDuration::from_mins(15));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            timezone = "UTC"

            [reminders]
            renotify_interval_minutes = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.reminders.renotify_interval_minutes, 60);
        assert_eq!(config.reminders.max_reminders, 3);
        assert_eq!(config.collaborator.model, "gpt-4o-mini");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_max_reminders_capped() {
        let config = Config::from_toml("[reminders]\nmax_reminders = 4\n").unwrap();
        assert!(config.validate().is_err());

        let config = Config::from_toml("[reminders]\nmax_reminders = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_slot_rejected() {
        let config = Config::from_toml(
            r#"
            [[planning.slots]]
            start = "21:00"
            end = "20:30"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_zone_rejected() {
        let config = Config::from_toml("timezone = \"Mars/Olympus\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("20:00").unwrap(), time(20, 0, 0, 0));
        assert_eq!(parse_clock(" 7:05 ").unwrap(), time(7, 5, 0, 0));
        assert!(parse_clock("25:00").is_err());
        assert!(parse_clock("2000").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ProctorError::FileSystem { .. }));
    }
}
