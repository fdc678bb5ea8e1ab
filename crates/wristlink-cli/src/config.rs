//! Configuration loading and validation

use anyhow::{Context, Result};
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use wristlink_proto::{Alarm, ClockMode, UserProfile};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub profile: UserProfile,
    #[serde(default)]
    pub clock_mode: ClockMode,
    #[serde(default, rename = "alarm")]
    pub alarms: Vec<AlarmConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Advertised name to look for while scanning
    #[serde(default = "default_name")]
    pub name: String,
    /// Band MAC address; takes precedence over the name when set
    #[serde(default)]
    pub address: Option<String>,
    /// How long to scan before giving up
    #[serde(default = "default_scan_timeout")]
    pub scan_timeout_secs: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            address: None,
            scan_timeout_secs: default_scan_timeout(),
        }
    }
}

fn default_name() -> String {
    "E26".to_string()
}

fn default_scan_timeout() -> u64 {
    10
}

/// One alarm entry, time given as "HH:MM"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmConfig {
    pub time: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl AlarmConfig {
    pub fn to_alarm(&self) -> Result<Alarm> {
        let time = NaiveTime::parse_from_str(&self.time, "%H:%M")
            .with_context(|| format!("invalid alarm time {:?}, expected HH:MM", self.time))?;
        Ok(Alarm {
            enabled: self.enabled,
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        })
    }
}

impl Config {
    /// Parse the configured alarms into wire-ready form.
    pub fn alarms(&self) -> Result<Vec<Alarm>> {
        self.alarms.iter().map(AlarmConfig::to_alarm).collect()
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

/// Save a starter configuration to file
pub fn save_default_config(path: &Path) -> Result<()> {
    let config = Config {
        device: DeviceConfig::default(),
        profile: UserProfile::default(),
        clock_mode: ClockMode::default(),
        alarms: vec![AlarmConfig {
            time: "07:30".to_string(),
            enabled: true,
        }],
    };

    let content = toml::to_string_pretty(&config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_alarm_time_parsing() {
        let alarm = AlarmConfig {
            time: "07:30".to_string(),
            enabled: true,
        };
        let parsed = alarm.to_alarm().unwrap();
        assert_eq!(parsed.hour, 7);
        assert_eq!(parsed.minute, 30);
        assert!(parsed.enabled);

        let bad = AlarmConfig {
            time: "25:00".to_string(),
            enabled: true,
        };
        assert!(bad.to_alarm().is_err());
    }

    #[test]
    fn test_config_parses_full_file() {
        let config: Config = toml::from_str(
            r#"
            clock_mode = "24h"

            [device]
            name = "E26"
            address = "AA:BB:CC:DD:EE:FF"

            [profile]
            age = 41
            step_goal = 12000

            [[alarm]]
            time = "06:45"

            [[alarm]]
            time = "21:00"
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.device.address.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
        assert_eq!(config.profile.age, 41);
        assert_eq!(config.profile.step_goal, 12000);
        // Unset profile fields fall back to their defaults
        assert_eq!(config.profile.height_cm, 175);
        assert_eq!(config.clock_mode, ClockMode::TwentyFourHour);

        let alarms = config.alarms().unwrap();
        assert_eq!(alarms.len(), 2);
        assert!(alarms[0].enabled);
        assert!(!alarms[1].enabled);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load_config(Path::new("/nonexistent/wristlink.toml")).unwrap();
        assert_eq!(config.device.name, "E26");
        assert_eq!(config.device.scan_timeout_secs, 10);
        assert!(config.alarms.is_empty());
    }

    #[test]
    fn test_starter_config_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wristlink.toml");
        save_default_config(&path).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.device.name, "E26");
        assert_eq!(config.device.address, None);
        assert_eq!(config.device.scan_timeout_secs, 10);
        assert_eq!(config.clock_mode, ClockMode::TwelveHour);
        assert_eq!(config.profile.age, 30);
        assert_eq!(config.profile.height_cm, 175);
        assert_eq!(config.profile.step_goal, 10_000);

        let alarms = config.alarms().unwrap();
        assert_eq!(alarms.len(), 1);
        assert!(alarms[0].enabled);
        assert_eq!((alarms[0].hour, alarms[0].minute), (7, 30));
    }
}
