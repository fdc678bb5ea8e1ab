//! Wristlink Session - command sequencing for E26 wristbands
//!
//! This crate sits between the wire protocol and a BLE stack. It tracks
//! the session state machine each connection must walk through, turns
//! requests into command plans, and drives those plans over an abstract
//! transport.

pub mod link;
pub mod plan;
pub mod sequencer;
pub mod transport;

pub use link::{BandLink, LinkError};
pub use plan::{CommandPlan, PlanStep};
pub use sequencer::{SequenceError, SessionSequencer, SessionState};
pub use transport::{Transport, TransportError, TransportHandle};
