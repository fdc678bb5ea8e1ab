//! Wristlink Proto - wire protocol for the wakeuptech E26 wristband
//!
//! This crate knows the band's GATT layout, its frame format, the
//! catalog of outgoing commands and the dispatch of incoming reports.
//! Everything here is synchronous and transport-free; byte slices in,
//! frames and events out.

pub mod codes;
pub mod command;
pub mod dispatch;
pub mod event;
pub mod frame;
pub mod profile;
pub mod uuids;

pub use command::VitalKind;
pub use dispatch::{decode_event, dispatch};
pub use event::{DeviceEvent, SensorMode};
pub use frame::{decode, DecodedFrame, EncodingError, RawFrame};
pub use profile::{Alarm, ClockMode, UnitSystem, UserProfile};
