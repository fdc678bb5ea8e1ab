//! Frame layout shared by every exchange with the band

use std::fmt;

use thiserror::Error;

use crate::codes;

/// Header length on both outgoing and incoming frames.
pub const HEADER_LEN: usize = 4;

/// Errors from building an outgoing frame.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// A slot value does not fit the documented range for its position.
    #[error("{slot} value {value} outside {min}..={max}")]
    SlotOutOfRange {
        slot: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}

/// One complete unit of binary data exchanged with the band.
#[derive(Clone, PartialEq, Eq)]
pub struct RawFrame(Vec<u8>);

impl RawFrame {
    /// Wrap bytes received from the transport.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        RawFrame(bytes)
    }

    /// Build an outgoing frame: `AB 00 <len> FF` followed by the body.
    pub(crate) fn from_body(body: &[u8]) -> Self {
        debug_assert!(body.len() < u8::MAX as usize);
        let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
        // Byte 0: preamble
        bytes.push(codes::PREAMBLE);
        // Byte 1: always zero
        bytes.push(0x00);
        // Byte 2: length, counting the body plus this byte
        bytes.push((body.len() + 1) as u8);
        // Byte 3: header tag
        bytes.push(codes::HEADER_TAG);
        bytes.extend_from_slice(body);
        RawFrame(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for RawFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawFrame({self})")
    }
}

/// An incoming frame split into its dispatch keys.
///
/// Keeps hold of the whole raw buffer: report field offsets count from the
/// start of the buffer, header included, exactly as the stock app reads
/// them.
#[derive(Debug, Clone, Copy)]
pub struct DecodedFrame<'a> {
    command: u8,
    sub: Option<u8>,
    raw: &'a [u8],
}

impl<'a> DecodedFrame<'a> {
    /// Report or command code, the first body byte.
    pub fn command(&self) -> u8 {
        self.command
    }

    /// Sensor sub-code, present only on sensor reports that carry one.
    pub fn sub(&self) -> Option<u8> {
        self.sub
    }

    /// Byte at `index` of the original raw buffer, header included.
    pub fn raw_byte(&self, index: usize) -> Option<u8> {
        self.raw.get(index).copied()
    }

    /// Body after the 4-byte header.
    pub fn headerless(&self) -> &'a [u8] {
        &self.raw[HEADER_LEN..]
    }
}

/// Split an incoming buffer into its dispatch keys.
///
/// Returns `None` when the buffer carries no bytes beyond the 4-byte
/// header; such frames have nothing to interpret and are not an error.
/// Field offsets are not validated here: the band pads frames
/// inconsistently, so readers bounds-check each offset they touch.
pub fn decode(raw: &[u8]) -> Option<DecodedFrame<'_>> {
    if raw.len() <= HEADER_LEN {
        return None;
    }
    let headerless = &raw[HEADER_LEN..];
    let command = headerless[0];
    let sub = if command == codes::REPORT_SENSOR {
        headerless.get(1).copied()
    } else {
        None
    };
    Some(DecodedFrame { command, sub, raw })
}
