//! User-facing settings synced to the band

use serde::{Deserialize, Serialize};

/// Measurement system shown on the band's display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Wire value for the unit flag slot of the prefs frame.
    pub fn wire_flag(self) -> u8 {
        match self {
            UnitSystem::Metric => 0x00,
            UnitSystem::Imperial => 0x01,
        }
    }
}

/// Profile values the band uses for its step-distance and calorie math.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default = "default_age")]
    pub age: u8,
    #[serde(default = "default_height_cm")]
    pub height_cm: u8,
    #[serde(default = "default_weight_kg")]
    pub weight_kg: u8,
    #[serde(default)]
    pub units: UnitSystem,
    /// Daily step goal. The band stores only the low byte of this value.
    #[serde(default = "default_step_goal")]
    pub step_goal: u32,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            age: default_age(),
            height_cm: default_height_cm(),
            weight_kg: default_weight_kg(),
            units: UnitSystem::default(),
            step_goal: default_step_goal(),
        }
    }
}

fn default_age() -> u8 {
    30
}

fn default_height_cm() -> u8 {
    175
}

fn default_weight_kg() -> u8 {
    70
}

fn default_step_goal() -> u32 {
    10_000
}

/// One alarm slot entry. The band has eight slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    pub enabled: bool,
    pub hour: u8,
    pub minute: u8,
}

/// Clock face format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClockMode {
    #[default]
    #[serde(rename = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    TwentyFourHour,
}
