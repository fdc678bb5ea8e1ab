//! Catalog of outgoing command frames
//!
//! Every frame the band accepts is a fixed byte template with a handful of
//! positional slots. The builders here fill the slots and refuse values
//! that do not fit their documented range; all other bytes are copied
//! unchanged from captured stock-app traffic.

use std::time::Duration;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::codes;
use crate::frame::{EncodingError, RawFrame};
use crate::profile::{Alarm, ClockMode, UserProfile};

/// Sensor selected by a switch command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalKind {
    HeartRate,
    BloodOxygen,
    BloodPressure,
}

impl VitalKind {
    /// How long the band needs before a one-shot result is ready.
    pub fn measurement_window(self) -> Duration {
        match self {
            VitalKind::HeartRate | VitalKind::BloodOxygen => Duration::from_secs(40),
            VitalKind::BloodPressure => Duration::from_secs(60),
        }
    }

    fn sub_code(self) -> u8 {
        match self {
            VitalKind::HeartRate => codes::SUB_HEART_RATE_REALTIME,
            VitalKind::BloodOxygen => codes::SUB_BLOOD_OXYGEN_REALTIME,
            VitalKind::BloodPressure => codes::SUB_BLOOD_PRESSURE_REALTIME,
        }
    }
}

/// Frame that makes the band vibrate so it can be located.
pub fn find_device() -> RawFrame {
    RawFrame::from_body(&[codes::CMD_FIND_BAND, codes::SET_MARKER])
}

/// Frame switching the clock face between 12 and 24 hour display.
pub fn clock_mode(mode: ClockMode) -> RawFrame {
    let flag = match mode {
        ClockMode::TwelveHour => 0x01,
        ClockMode::TwentyFourHour => 0x00,
    };
    RawFrame::from_body(&[codes::CMD_CLOCK_MODE, codes::SET_MARKER, flag])
}

/// Date/time sync frame.
///
/// Bytes 6-8 are fixed: the stock app stamps the year 2017 on every frame
/// it sends, whatever the actual date, and what the band does with those
/// bytes is unknown, so they stay as captured. The month goes out 1-based.
pub fn set_date_time(at: NaiveDateTime) -> RawFrame {
    let mut body = Vec::with_capacity(10);
    body.push(codes::CMD_SET_DATE_TIME);
    body.push(codes::SET_MARKER);
    body.extend_from_slice(&codes::DATE_FIXED_PREFIX);
    // chrono months are already 1-based, matching the wire format
    body.push(at.month() as u8);
    body.push(at.day() as u8);
    body.push(at.hour() as u8);
    body.push(at.minute() as u8);
    body.push(at.second() as u8);
    RawFrame::from_body(&body)
}

/// User preference sync frame.
///
/// The protocol has no partial update: any preference change re-sends the
/// whole block. The step goal slot holds only the goal's low byte, and the
/// eight-byte suffix is opaque, reproduced verbatim from stock traffic.
pub fn set_user_prefs(profile: &UserProfile) -> RawFrame {
    let (step_length, height, weight) = body_measurements(profile);
    let mut body = Vec::with_capacity(16);
    body.push(codes::CMD_SET_USER_PREFS);
    body.push(codes::SET_MARKER);
    body.push(step_length);
    body.push(profile.age);
    body.push(height);
    body.push(weight);
    body.push(profile.units.wire_flag());
    body.push(profile.step_goal as u8);
    body.extend_from_slice(&codes::PREFS_SUFFIX);
    RawFrame::from_body(&body)
}

/// Frame programming one of the eight alarm slots. Slots are 1-based.
///
/// Disabled alarms still produce a frame, with the enable flag cleared, so
/// stale slots on the band get overwritten.
pub fn set_alarm(slot: u8, alarm: &Alarm) -> Result<RawFrame, EncodingError> {
    check_slot("alarm slot", slot.into(), 1, codes::ALARM_SLOTS.into())?;
    check_slot("alarm hour", alarm.hour.into(), 0, 23)?;
    check_slot("alarm minute", alarm.minute.into(), 0, 59)?;
    Ok(RawFrame::from_body(&[
        codes::CMD_SET_ALARM,
        codes::SET_MARKER,
        slot,
        alarm.enabled as u8,
        alarm.hour,
        alarm.minute,
        codes::ALARM_TYPE_ONCE,
    ]))
}

/// Frame starting or stopping a sensor measurement.
///
/// The same frame drives both the one-shot tests and the realtime heart
/// rate stream; results come back tagged with the matching report
/// sub-code.
pub fn sensor_switch(kind: VitalKind, enabled: bool) -> RawFrame {
    RawFrame::from_body(&[codes::CMD_SENSOR_SWITCH, kind.sub_code(), enabled as u8])
}

fn check_slot(slot: &'static str, value: u32, min: u32, max: u32) -> Result<(), EncodingError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(EncodingError::SlotOutOfRange {
            slot,
            value,
            min,
            max,
        })
    }
}

#[cfg(not(feature = "imperial-units"))]
fn body_measurements(profile: &UserProfile) -> (u8, u8, u8) {
    // The band can display imperial units, but the stock app ships its
    // imperial conversion disabled. Until someone verifies the converted
    // values on hardware, metric bytes go out for both unit settings.
    (codes::STEP_LENGTH_METRIC, profile.height_cm, profile.weight_kg)
}

#[cfg(feature = "imperial-units")]
fn body_measurements(profile: &UserProfile) -> (u8, u8, u8) {
    use crate::profile::UnitSystem;

    match profile.units {
        UnitSystem::Metric => (codes::STEP_LENGTH_METRIC, profile.height_cm, profile.weight_kg),
        UnitSystem::Imperial => (
            codes::STEP_LENGTH_IMPERIAL,
            cm_to_inches(profile.height_cm),
            kg_to_pounds(profile.weight_kg),
        ),
    }
}

#[cfg(feature = "imperial-units")]
fn cm_to_inches(cm: u8) -> u8 {
    (f32::from(cm) * 0.393_700_79).ceil() as u8
}

#[cfg(feature = "imperial-units")]
fn kg_to_pounds(kg: u8) -> u8 {
    // Saturates at 255 for weights past 115 kg
    (f32::from(kg) * 2.204_622_62).ceil() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::UnitSystem;
    use chrono::NaiveDate;

    #[test]
    fn test_find_device_frame() {
        let frame = find_device();
        assert_eq!(frame.as_bytes(), &[0xAB, 0x00, 0x03, 0xFF, 0x71, 0x80]);
    }

    #[test]
    fn test_clock_mode_frames() {
        let twelve = clock_mode(ClockMode::TwelveHour);
        assert_eq!(twelve.as_bytes(), &[0xAB, 0x00, 0x04, 0xFF, 0x7C, 0x80, 0x01]);

        let twenty_four = clock_mode(ClockMode::TwentyFourHour);
        assert_eq!(twenty_four.as_bytes(), &[0xAB, 0x00, 0x04, 0xFF, 0x7C, 0x80, 0x00]);
    }

    #[test]
    fn test_date_time_frame() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 59)
            .unwrap();
        let frame = set_date_time(at);
        assert_eq!(
            frame.as_bytes(),
            &[0xAB, 0x00, 0x0B, 0xFF, 0x93, 0x80, 0x00, 0x07, 0xE1, 3, 9, 14, 5, 59]
        );
    }

    #[test]
    fn test_date_time_year_is_fixed() {
        let at = NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let frame = set_date_time(at);
        // Year bytes stay 2017 no matter the input date
        assert_eq!(&frame.as_bytes()[6..9], &[0x00, 0x07, 0xE1]);
    }

    #[test]
    fn test_date_time_month_is_one_based() {
        // Assumed, not hardware-verified: the stock app emits December as
        // 12 after adjusting its zero-based calendar, and that output is
        // matched here. Flagged in case the band actually wants 0-11.
        let at = NaiveDate::from_ymd_opt(2024, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        assert_eq!(set_date_time(at).as_bytes()[9], 12);
    }

    #[test]
    fn test_user_prefs_frame() {
        let profile = UserProfile {
            age: 30,
            height_cm: 175,
            weight_kg: 70,
            units: UnitSystem::Metric,
            step_goal: 10_000,
        };
        let frame = set_user_prefs(&profile);
        assert_eq!(
            frame.as_bytes(),
            &[
                0xAB, 0x00, 0x11, 0xFF, 0x74, 0x80, 0x47, 30, 175, 70, 0x00, 0x10, 0x5A, 0x82,
                0x3C, 0x5A, 0x3C, 0x64, 0x5D, 0x64
            ]
        );
    }

    #[test]
    fn test_step_goal_keeps_low_byte() {
        let profile = UserProfile {
            step_goal: 10_000,
            ..UserProfile::default()
        };
        // 10000 = 0x2710; the slot is one byte wide
        assert_eq!(set_user_prefs(&profile).as_bytes()[11], 0x10);
    }

    #[test]
    fn test_alarm_frame() {
        let alarm = Alarm {
            enabled: true,
            hour: 7,
            minute: 30,
        };
        let frame = set_alarm(1, &alarm).unwrap();
        assert_eq!(
            frame.as_bytes(),
            &[0xAB, 0x00, 0x08, 0xFF, 0x73, 0x80, 0x01, 0x01, 7, 30, 0x80]
        );
    }

    #[test]
    fn test_disabled_alarm_still_emits() {
        let alarm = Alarm {
            enabled: false,
            hour: 7,
            minute: 30,
        };
        let frame = set_alarm(3, &alarm).unwrap();
        assert_eq!(frame.as_bytes()[6], 3);
        assert_eq!(frame.as_bytes()[7], 0x00);
    }

    #[test]
    fn test_alarm_slot_ranges() {
        let alarm = Alarm {
            enabled: true,
            hour: 7,
            minute: 30,
        };
        assert!(matches!(
            set_alarm(0, &alarm),
            Err(EncodingError::SlotOutOfRange { slot: "alarm slot", .. })
        ));
        assert!(matches!(
            set_alarm(9, &alarm),
            Err(EncodingError::SlotOutOfRange { slot: "alarm slot", .. })
        ));

        let bad_hour = Alarm {
            enabled: true,
            hour: 24,
            minute: 0,
        };
        assert!(matches!(
            set_alarm(1, &bad_hour),
            Err(EncodingError::SlotOutOfRange { slot: "alarm hour", value: 24, .. })
        ));

        let bad_minute = Alarm {
            enabled: true,
            hour: 0,
            minute: 60,
        };
        assert!(matches!(
            set_alarm(1, &bad_minute),
            Err(EncodingError::SlotOutOfRange { slot: "alarm minute", value: 60, .. })
        ));
    }

    #[test]
    fn test_sensor_switch_frames() {
        let enable_hr = sensor_switch(VitalKind::HeartRate, true);
        assert_eq!(enable_hr.as_bytes(), &[0xAB, 0x00, 0x04, 0xFF, 0x31, 0x09, 0x01]);

        let disable_hr = sensor_switch(VitalKind::HeartRate, false);
        assert_eq!(disable_hr.as_bytes(), &[0xAB, 0x00, 0x04, 0xFF, 0x31, 0x09, 0x00]);

        let enable_spo2 = sensor_switch(VitalKind::BloodOxygen, true);
        assert_eq!(enable_spo2.as_bytes()[5], 0x11);

        let enable_bp = sensor_switch(VitalKind::BloodPressure, true);
        assert_eq!(enable_bp.as_bytes()[5], 0x21);
    }

    #[test]
    fn test_measurement_windows() {
        assert_eq!(VitalKind::HeartRate.measurement_window(), Duration::from_secs(40));
        assert_eq!(VitalKind::BloodOxygen.measurement_window(), Duration::from_secs(40));
        assert_eq!(VitalKind::BloodPressure.measurement_window(), Duration::from_secs(60));
    }

    #[cfg(feature = "imperial-units")]
    #[test]
    fn test_imperial_conversion() {
        let profile = UserProfile {
            age: 30,
            height_cm: 175,
            weight_kg: 70,
            units: UnitSystem::Imperial,
            step_goal: 10_000,
        };
        let frame = set_user_prefs(&profile);
        // 175 cm -> 69 in, 70 kg -> 155 lb, imperial step length
        assert_eq!(frame.as_bytes()[6], 0x1C);
        assert_eq!(frame.as_bytes()[8], 69);
        assert_eq!(frame.as_bytes()[9], 155);
    }
}
