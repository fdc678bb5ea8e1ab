//! GATT identifiers for the band
//!
//! The band exposes the Nordic UART Service layout: one service with a write
//! characteristic for command frames and a notify characteristic for report
//! frames. A second vendor service advertises step data; scans use either
//! service to recognize a band, nothing subscribes to the step one.

use uuid::{uuid, Uuid};

/// Primary service (Nordic UART Service layout).
pub const BAND_SERVICE: Uuid = uuid!("6e400001-b5a3-f393-e0a9-e50e24dcca9e");

/// Write characteristic; every command frame goes here.
pub const CONTROL_CHARACTERISTIC: Uuid = uuid!("6e400002-b5a3-f393-e0a9-e50e24dcca9e");

/// Notify characteristic; every report frame arrives here.
pub const MEASURE_CHARACTERISTIC: Uuid = uuid!("6e400003-b5a3-f393-e0a9-e50e24dcca9e");

/// Vendor step service advertised alongside the primary service.
pub const STEP_SERVICE: Uuid = uuid!("0000fee7-0000-1000-8000-00805f9b34fb");

/// Step measure characteristic; the vendor reuses the service UUID for it.
pub const STEP_MEASURE_CHARACTERISTIC: Uuid = uuid!("0000fee7-0000-1000-8000-00805f9b34fb");
