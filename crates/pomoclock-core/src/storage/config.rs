//! TOML-based application configuration.
//!
//! Stores:
//! - Timer policy (durations, escalation threshold, restart behavior)
//! - Display strings used by the terminal widget
//!
//! Configuration is stored at `~/.config/pomoclock/config.toml` unless
//! `POMOCLOCK_CONFIG` points elsewhere.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::config_path;
use crate::error::{ConfigError, CoreError, Result};
use crate::timer::{SessionScheduler, TimerPolicy};

/// Strings shown by the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_title_prefix")]
    pub title_prefix: String,
    #[serde(default = "default_alert_title")]
    pub alert_title: String,
    #[serde(default = "default_alert_text")]
    pub alert_text: String,
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerPolicy,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_title_prefix() -> String {
    "Pomodoro App".into()
}
fn default_alert_title() -> String {
    "Time is up!".into()
}
fn default_alert_text() -> String {
    "Take a break and start again after:".into()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title_prefix: default_title_prefix(),
            alert_title: default_alert_title(),
            alert_text: default_alert_text(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parents, leaf) = match key.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parents) = parents {
            for part in parents.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;
        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
            ),
            serde_json::Value::Number(_) => {
                let n = value
                    .parse::<i64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?;
                serde_json::Value::Number(n.into())
            }
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                return Err(invalid("cannot assign to a table".into()));
            }
            _ => serde_json::Value::String(value.into()),
        };
        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    /// Load from `path`, writing defaults there if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, if it
    /// holds an invalid timer policy, or if the defaults cannot be written.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(ConfigError::from)?;
                cfg.timer.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Load from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Persist to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path()?)
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key. The change is applied only if the
    /// resulting timer policy still validates.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys, unparsable values, or a policy that
    /// fails validation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.timer.validate().map_err(CoreError::from)?;
        *self = updated;
        Ok(())
    }

    /// Build a scheduler from the timer section.
    pub fn scheduler(&self) -> Result<SessionScheduler> {
        Ok(SessionScheduler::new(self.timer.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::RestartBehavior;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.work_duration_secs").as_deref(), Some("1500"));
        assert_eq!(cfg.get("timer.restart_behavior").as_deref(), Some("zero"));
        assert_eq!(cfg.get("display.title_prefix").as_deref(), Some("Pomodoro App"));
        assert!(cfg.get("timer.missing_key").is_none());
    }

    #[test]
    fn set_updates_number_bool_and_enum() {
        let mut cfg = Config::default();
        cfg.set("timer.escalation_threshold_sessions", "4").unwrap();
        cfg.set("timer.allow_break_pause", "true").unwrap();
        cfg.set("timer.restart_behavior", "full_duration").unwrap();
        assert_eq!(cfg.timer.escalation_threshold_sessions, 4);
        assert!(cfg.timer.allow_break_pause);
        assert_eq!(cfg.timer.restart_behavior, RestartBehavior::FullDuration);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("timer.nonexistent", "1").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("timer.allow_break_pause", "maybe").is_err());
        assert!(cfg.set("timer.restart_behavior", "sideways").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn set_rejects_negative_duration_and_keeps_old_value() {
        let mut cfg = Config::default();
        let err = cfg.set("timer.work_duration_secs", "-60").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(cfg.timer.work_duration_secs, 1500);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn load_from_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\nwork_duration_secs = 120\n").unwrap();
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.timer.work_duration_secs, 120);
        assert_eq!(cfg.timer.base_break_duration_secs, 300);
        assert_eq!(cfg.display, DisplayConfig::default());
    }

    #[test]
    fn load_from_rejects_negative_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\nbase_break_duration_secs = -1\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::ParseFailed(_))));
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("display.title_prefix", "Focus").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().display.title_prefix, "Focus");
    }

    #[test]
    fn scheduler_uses_timer_section() {
        let mut cfg = Config::default();
        cfg.set("timer.work_duration_secs", "90").unwrap();
        assert_eq!(cfg.scheduler().unwrap().remaining_secs(), 90);
    }
}
