//! Wire constants for the band protocol
//!
//! Byte values collected from captured traffic between the band and its
//! stock companion app. Frames are positional; the constants below name the
//! fixed bytes, the builders in [`crate::command`] fill the slots.

/// First byte of every frame, both directions.
pub const PREAMBLE: u8 = 0xAB;

/// Fourth byte of every frame.
pub const HEADER_TAG: u8 = 0xFF;

// Command bytes (first body byte of frames sent to the band).

/// Make the band vibrate so it can be found.
pub const CMD_FIND_BAND: u8 = 0x71;
/// Switch the clock face between 12 and 24 hour display.
pub const CMD_CLOCK_MODE: u8 = 0x7C;
/// Sync date and time.
pub const CMD_SET_DATE_TIME: u8 = 0x93;
/// Sync the whole user preference block.
pub const CMD_SET_USER_PREFS: u8 = 0x74;
/// Program one alarm slot.
pub const CMD_SET_ALARM: u8 = 0x73;
/// Start or stop a sensor measurement.
pub const CMD_SENSOR_SWITCH: u8 = 0x31;

/// Marker byte that follows the command byte in every set/control frame
/// except the sensor switch, which carries its sub-code there instead.
pub const SET_MARKER: u8 = 0x80;

// Report codes (first body byte of notification frames).

/// Battery level and charge status.
pub const REPORT_BATTERY: u8 = 0x91;
/// Firmware version bytes.
pub const REPORT_DEVICE_INFO: u8 = 0x92;
/// Sensor reading; fans out on the sub-code byte.
pub const REPORT_SENSOR: u8 = 0x31;
/// Combined snapshot of the latest stored measurements.
pub const REPORT_ALL_VITALS: u8 = 0x32;
/// The band's locate-phone button was pressed.
pub const REPORT_LOCATE_PHONE: u8 = 0x7D;
/// Step history block; layout undocumented, left unparsed.
pub const REPORT_STEPS: u8 = 0xF9;

// Sensor sub-codes (second body byte under REPORT_SENSOR). The switch
// commands carry the realtime code of each pair; stored one-shot results
// come back on the code one above it.

pub const SUB_HEART_RATE_REALTIME: u8 = 0x09;
pub const SUB_HEART_RATE_TIMED: u8 = 0x0A;
pub const SUB_BLOOD_OXYGEN_REALTIME: u8 = 0x11;
pub const SUB_BLOOD_OXYGEN_TIMED: u8 = 0x12;
pub const SUB_BLOOD_PRESSURE_REALTIME: u8 = 0x21;
pub const SUB_BLOOD_PRESSURE_TIMED: u8 = 0x22;

// Fixed template bytes.

/// Number of alarm slots on the band.
pub const ALARM_SLOTS: u8 = 8;
/// Alarm type byte; only the one-time type has been observed.
pub const ALARM_TYPE_ONCE: u8 = 0x80;
/// Step length byte sent with metric preferences.
pub const STEP_LENGTH_METRIC: u8 = 0x47;
/// Step length byte for the imperial conversion path.
pub const STEP_LENGTH_IMPERIAL: u8 = 0x1C;

/// Bytes 6-8 of the date/time frame. The trailing pair is the year 2017
/// big-endian; the stock app stamps it on every frame regardless of the
/// actual date.
pub const DATE_FIXED_PREFIX: [u8; 3] = [0x00, 0x07, 0xE1];

/// Opaque suffix of the user-prefs frame. Meaning unknown; the stock app
/// sends exactly these bytes every time and the band rejects nothing, so
/// they are copied verbatim.
pub const PREFS_SUFFIX: [u8; 8] = [0x5A, 0x82, 0x3C, 0x5A, 0x3C, 0x64, 0x5D, 0x64];

/// Command codes from the vendor SDK header that the stock app never emits
/// for this band generation. No frame layouts are documented for them, so
/// there are no builders; kept for reference.
pub mod reserved {
    pub const CMD_SET_DATE_AND_TIME: u8 = 0x08;
    pub const CMD_SET_HEARTRATE_AUTO: u8 = 0x38;
    pub const CMD_SET_HEARTRATE_WARNING_VALUE: u8 = 0x01;
    pub const CMD_SET_TARGET_STEPS: u8 = 0x03;
    pub const CMD_GET_STEP_COUNT: u8 = 0x1D;
    pub const CMD_GET_SLEEP_TIME: u8 = 0x32;
    pub const CMD_SET_NOON_TIME: u8 = 0x26;
    pub const CMD_SET_SLEEP_TIME: u8 = 0x27;
    pub const CMD_SET_DND_SETTINGS: u8 = 0x39;
    pub const CMD_SET_INACTIVITY_WARNING_TIME: u8 = 0x24;
    pub const CMD_HEARTRATE_SWITCH: u8 = 0x0D;
    pub const CMD_SHOW_NOTIFICATION: u8 = 0x2C;
    pub const CMD_REBOOT_DEVICE: u8 = 0x0E;
}

/// Icon selector for the reserved show-notification command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NotificationIcon {
    Call = 0,
    Sms = 1,
    WeChat = 2,
    Qq = 3,
    Facebook = 4,
    Skype = 5,
    Twitter = 6,
    WhatsApp = 7,
    Line = 8,
}

impl NotificationIcon {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Call),
            1 => Some(Self::Sms),
            2 => Some(Self::WeChat),
            3 => Some(Self::Qq),
            4 => Some(Self::Facebook),
            5 => Some(Self::Skype),
            6 => Some(Self::Twitter),
            7 => Some(Self::WhatsApp),
            8 => Some(Self::Line),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_switch_shares_report_code() {
        // Outgoing switch frames and incoming sensor reports use the same
        // selector byte; dispatch relies on direction to tell them apart
        assert_eq!(CMD_SENSOR_SWITCH, REPORT_SENSOR);
    }

    #[test]
    fn test_notification_icon_round_trip() {
        for value in 0..=8 {
            let icon = NotificationIcon::from_u8(value).unwrap();
            assert_eq!(icon.as_u8(), value);
        }
        assert_eq!(NotificationIcon::from_u8(9), None);
    }
}
