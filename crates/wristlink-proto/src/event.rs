//! Events decoded from band reports

use serde::{Deserialize, Serialize};

/// Whether a reading came from a scheduled sweep or a live measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorMode {
    /// Background reading the band took on its own schedule.
    Timed,
    /// Reading produced while a measurement was running.
    Realtime,
}

/// Something the band told us.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceEvent {
    /// Firmware revision, reported once after connect.
    FirmwareVersion { version: String },
    /// Battery state of charge.
    BatteryLevel { percent: u8, charging: bool },
    /// The find-my-phone button on the band was pressed.
    LocatePhoneTriggered,
    HeartRate { bpm: u8, mode: SensorMode },
    BloodOxygen { percent: u8, mode: SensorMode },
    BloodPressure {
        systolic: u8,
        diastolic: u8,
        mode: SensorMode,
    },
    /// Combined snapshot of all sensors, sent after some sweeps.
    AllVitals {
        heart_rate: u8,
        blood_oxygen: u8,
        systolic: u8,
        diastolic: u8,
    },
    /// Report with a command code this crate does not know.
    Unhandled { code: u8 },
}
