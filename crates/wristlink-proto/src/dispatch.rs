//! Report dispatch tables
//!
//! Routing is data: a constant table maps each report code to a
//! constructor, and the sensor report code carries a second table keyed
//! on the sub-code. Field offsets below index the raw frame with its
//! header still attached; payloads start at byte 4, so the first field of
//! most reports sits at byte 6.

use tracing::debug;

use crate::codes;
use crate::event::{DeviceEvent, SensorMode};
use crate::frame::{decode, DecodedFrame};

type Constructor = fn(&DecodedFrame) -> Option<DeviceEvent>;

enum Dispatch {
    /// Report fully identified by its command code.
    Terminal(Constructor),
    /// Report needing a second lookup on the sub-code.
    Sensor(&'static [(u8, SensorReport)]),
}

#[derive(Clone, Copy)]
enum SensorReport {
    HeartRate(SensorMode),
    BloodOxygen(SensorMode),
    BloodPressure(SensorMode),
}

const DISPATCH: &[(u8, Dispatch)] = &[
    (codes::REPORT_BATTERY, Dispatch::Terminal(battery_level)),
    (codes::REPORT_DEVICE_INFO, Dispatch::Terminal(firmware_version)),
    (codes::REPORT_SENSOR, Dispatch::Sensor(SENSOR_DISPATCH)),
    (codes::REPORT_ALL_VITALS, Dispatch::Terminal(all_vitals)),
    (codes::REPORT_LOCATE_PHONE, Dispatch::Terminal(locate_phone)),
];

const SENSOR_DISPATCH: &[(u8, SensorReport)] = &[
    (codes::SUB_HEART_RATE_REALTIME, SensorReport::HeartRate(SensorMode::Realtime)),
    (codes::SUB_HEART_RATE_TIMED, SensorReport::HeartRate(SensorMode::Timed)),
    (codes::SUB_BLOOD_OXYGEN_REALTIME, SensorReport::BloodOxygen(SensorMode::Realtime)),
    (codes::SUB_BLOOD_OXYGEN_TIMED, SensorReport::BloodOxygen(SensorMode::Timed)),
    (codes::SUB_BLOOD_PRESSURE_REALTIME, SensorReport::BloodPressure(SensorMode::Realtime)),
    (codes::SUB_BLOOD_PRESSURE_TIMED, SensorReport::BloodPressure(SensorMode::Timed)),
];

/// Decode a notification buffer straight to an event.
///
/// Returns `None` for buffers too short to carry a report and for
/// recognized reports whose payload is truncated. Unknown codes are not
/// an error; they come back as [`DeviceEvent::Unhandled`].
pub fn decode_event(raw: &[u8]) -> Option<DeviceEvent> {
    let frame = decode(raw)?;
    let event = dispatch(&frame);
    if event.is_none() {
        debug!(
            command = frame.command(),
            len = raw.len(),
            "report too short for its command, dropping"
        );
    }
    event
}

/// Route an already decoded frame to its event constructor.
pub fn dispatch(frame: &DecodedFrame) -> Option<DeviceEvent> {
    match lookup(DISPATCH, frame.command()) {
        Some(Dispatch::Terminal(build)) => build(frame),
        Some(Dispatch::Sensor(table)) => dispatch_sensor(table, frame),
        None => Some(DeviceEvent::Unhandled {
            code: frame.command(),
        }),
    }
}

fn dispatch_sensor(table: &[(u8, SensorReport)], frame: &DecodedFrame) -> Option<DeviceEvent> {
    let sub = frame.sub()?;
    match lookup(table, sub) {
        Some(report) => sensor_event(*report, frame),
        None => {
            debug!(sub, "unknown sensor report sub-code");
            Some(DeviceEvent::Unhandled {
                code: frame.command(),
            })
        }
    }
}

fn lookup<T>(table: &[(u8, T)], code: u8) -> Option<&T> {
    table.iter().find(|(key, _)| *key == code).map(|(_, entry)| entry)
}

fn sensor_event(report: SensorReport, frame: &DecodedFrame) -> Option<DeviceEvent> {
    Some(match report {
        SensorReport::HeartRate(mode) => DeviceEvent::HeartRate {
            bpm: frame.raw_byte(6)?,
            mode,
        },
        SensorReport::BloodOxygen(mode) => DeviceEvent::BloodOxygen {
            percent: frame.raw_byte(6)?,
            mode,
        },
        SensorReport::BloodPressure(mode) => DeviceEvent::BloodPressure {
            systolic: frame.raw_byte(6)?,
            diastolic: frame.raw_byte(7)?,
            mode,
        },
    })
}

fn firmware_version(frame: &DecodedFrame) -> Option<DeviceEvent> {
    let major = frame.raw_byte(6)?;
    let minor = frame.raw_byte(7)?;
    Some(DeviceEvent::FirmwareVersion {
        version: format_version(major, minor),
    })
}

/// Render the two version bytes the way the stock app displays them.
///
/// The bytes merge into a float, so "1.0" keeps its trailing zero and a
/// minor byte past 99 wraps. Debug formatting of `f32` picks the shortest
/// round-tripping decimal, which matches the stock app's rendering.
fn format_version(major: u8, minor: u8) -> String {
    let merged = f32::from(major) + (f32::from(minor) % 100.0) / 100.0;
    format!("{merged:?}")
}

fn battery_level(frame: &DecodedFrame) -> Option<DeviceEvent> {
    let charging = frame.raw_byte(6)? != 0;
    let percent = frame.raw_byte(7)?;
    Some(DeviceEvent::BatteryLevel { percent, charging })
}

fn locate_phone(frame: &DecodedFrame) -> Option<DeviceEvent> {
    // The press always carries a flag byte; its meaning is unknown, so it
    // is only logged.
    let flag = frame.raw_byte(6)?;
    debug!(flag, "locate phone pressed");
    Some(DeviceEvent::LocatePhoneTriggered)
}

fn all_vitals(frame: &DecodedFrame) -> Option<DeviceEvent> {
    Some(DeviceEvent::AllVitals {
        heart_rate: frame.raw_byte(7)?,
        blood_oxygen: frame.raw_byte(8)?,
        systolic: frame.raw_byte(9)?,
        diastolic: frame.raw_byte(10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_report() {
        let event = decode_event(&[0xAB, 0x00, 0x05, 0xFF, 0x91, 0x80, 0x00, 87]);
        assert_eq!(
            event,
            Some(DeviceEvent::BatteryLevel {
                percent: 87,
                charging: false
            })
        );

        let charging = decode_event(&[0xAB, 0x00, 0x05, 0xFF, 0x91, 0x80, 0x01, 55]);
        assert_eq!(
            charging,
            Some(DeviceEvent::BatteryLevel {
                percent: 55,
                charging: true
            })
        );
    }

    #[test]
    fn test_firmware_report() {
        let event = decode_event(&[0xAB, 0x00, 0x05, 0xFF, 0x92, 0x80, 1, 23]);
        assert_eq!(
            event,
            Some(DeviceEvent::FirmwareVersion {
                version: "1.23".to_string()
            })
        );
    }

    #[test]
    fn test_firmware_keeps_trailing_zero() {
        let event = decode_event(&[0xAB, 0x00, 0x05, 0xFF, 0x92, 0x80, 1, 0]);
        assert_eq!(
            event,
            Some(DeviceEvent::FirmwareVersion {
                version: "1.0".to_string()
            })
        );
    }

    #[test]
    fn test_heart_rate_realtime() {
        let event = decode_event(&[0xAB, 0x00, 0x04, 0xFF, 0x31, 0x09, 72]);
        assert_eq!(
            event,
            Some(DeviceEvent::HeartRate {
                bpm: 72,
                mode: SensorMode::Realtime
            })
        );
    }

    #[test]
    fn test_heart_rate_timed() {
        let event = decode_event(&[0xAB, 0x00, 0x04, 0xFF, 0x31, 0x0A, 68]);
        assert_eq!(
            event,
            Some(DeviceEvent::HeartRate {
                bpm: 68,
                mode: SensorMode::Timed
            })
        );
    }

    #[test]
    fn test_blood_oxygen() {
        let event = decode_event(&[0xAB, 0x00, 0x04, 0xFF, 0x31, 0x11, 98]);
        assert_eq!(
            event,
            Some(DeviceEvent::BloodOxygen {
                percent: 98,
                mode: SensorMode::Realtime
            })
        );

        let timed = decode_event(&[0xAB, 0x00, 0x04, 0xFF, 0x31, 0x12, 97]);
        assert_eq!(
            timed,
            Some(DeviceEvent::BloodOxygen {
                percent: 97,
                mode: SensorMode::Timed
            })
        );
    }

    #[test]
    fn test_blood_pressure() {
        let event = decode_event(&[0xAB, 0x00, 0x05, 0xFF, 0x31, 0x21, 120, 80]);
        assert_eq!(
            event,
            Some(DeviceEvent::BloodPressure {
                systolic: 120,
                diastolic: 80,
                mode: SensorMode::Realtime
            })
        );
    }

    #[test]
    fn test_all_vitals() {
        let event = decode_event(&[0xAB, 0x00, 0x08, 0xFF, 0x32, 0x80, 0x00, 70, 98, 120, 80]);
        assert_eq!(
            event,
            Some(DeviceEvent::AllVitals {
                heart_rate: 70,
                blood_oxygen: 98,
                systolic: 120,
                diastolic: 80
            })
        );
    }

    #[test]
    fn test_locate_phone() {
        let event = decode_event(&[0xAB, 0x00, 0x04, 0xFF, 0x7D, 0x80, 0x01]);
        assert_eq!(event, Some(DeviceEvent::LocatePhoneTriggered));
    }

    #[test]
    fn test_unknown_command_is_unhandled() {
        for bytes in [
            &[0xAB, 0x00, 0x02, 0xFF, 0x55][..],
            &[0xAB, 0x00, 0x05, 0xFF, 0x55, 0x80, 0x01, 0x02][..],
        ] {
            assert_eq!(decode_event(bytes), Some(DeviceEvent::Unhandled { code: 0x55 }));
        }
    }

    #[test]
    fn test_unknown_sensor_sub_is_unhandled() {
        let event = decode_event(&[0xAB, 0x00, 0x04, 0xFF, 0x31, 0x77, 42]);
        assert_eq!(event, Some(DeviceEvent::Unhandled { code: 0x31 }));
    }

    #[test]
    fn test_truncated_battery_report() {
        // Command byte present but the payload stops before the level
        assert_eq!(decode_event(&[0xAB, 0x00, 0x03, 0xFF, 0x91, 0x80]), None);
    }

    #[test]
    fn test_sensor_report_missing_sub() {
        assert_eq!(decode_event(&[0xAB, 0x00, 0x02, 0xFF, 0x31]), None);
    }

    #[test]
    fn test_short_buffers_produce_nothing() {
        assert_eq!(decode_event(&[]), None);
        assert_eq!(decode_event(&[0xAB, 0x00, 0x01, 0xFF]), None);
    }
}
