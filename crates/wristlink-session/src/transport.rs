//! Transport seam between the link driver and a BLE stack
//!
//! The link driver only needs two GATT verbs, so that is all the trait
//! asks for. Implementations live with whatever Bluetooth stack the
//! caller uses; tests use an in-memory recorder.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use wristlink_proto::RawFrame;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("characteristic {0} not available on this connection")]
    CharacteristicUnavailable(Uuid),
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("subscribe failed: {0}")]
    SubscribeFailed(String),
    #[error("connection closed")]
    Closed,
}

/// GATT operations the link driver needs from a connected band.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Write one frame to the given characteristic.
    async fn send_frame(
        &self,
        characteristic: Uuid,
        frame: &RawFrame,
    ) -> Result<(), TransportError>;

    /// Enable notifications on the given characteristic.
    async fn subscribe_notifications(&self, characteristic: Uuid) -> Result<(), TransportError>;
}

/// Shared handle to a transport, cloned into the link driver.
pub type TransportHandle = Arc<dyn Transport>;
