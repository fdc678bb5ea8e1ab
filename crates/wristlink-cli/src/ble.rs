//! BLE plumbing for talking to a band
//!
//! Scanning, connecting and the notification pump live here; everything
//! protocol-shaped stays in the session and proto crates. `BleTransport`
//! adapts a connected btleplug peripheral to the transport trait the
//! link driver expects.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use btleplug::api::{Central, Characteristic, Manager as _, Peripheral as _, ScanFilter, WriteType};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::StreamExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use wristlink_proto::{uuids, RawFrame};
use wristlink_session::{BandLink, Transport, TransportError};

use crate::config::DeviceConfig;

/// Get the default Bluetooth adapter
pub async fn adapter() -> Result<Adapter> {
    let manager = Manager::new().await?;
    manager
        .adapters()
        .await?
        .into_iter()
        .next()
        .context("no Bluetooth adapter found")
}

/// Scan for the configured band and return it once seen.
pub async fn discover_band(adapter: &Adapter, device: &DeviceConfig) -> Result<Peripheral> {
    adapter.start_scan(ScanFilter::default()).await?;
    info!(name = %device.name, timeout_secs = device.scan_timeout_secs, "scanning for band");

    let deadline = tokio::time::Instant::now() + Duration::from_secs(device.scan_timeout_secs);
    let found = 'scan: loop {
        for peripheral in adapter.peripherals().await? {
            if matches_device(&peripheral, device).await? {
                break 'scan Some(peripheral);
            }
        }
        if tokio::time::Instant::now() >= deadline {
            break 'scan None;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    };
    adapter.stop_scan().await?;

    let peripheral = found.with_context(|| match &device.address {
        Some(address) => format!("no band with address {address} found"),
        None => format!("no band named {:?} found", device.name),
    })?;
    info!(address = %peripheral.address(), "found band");
    Ok(peripheral)
}

async fn matches_device(peripheral: &Peripheral, device: &DeviceConfig) -> Result<bool> {
    let props = match peripheral.properties().await? {
        Some(props) => props,
        None => return Ok(false),
    };
    if let Some(address) = &device.address {
        return Ok(props.address.to_string().eq_ignore_ascii_case(address));
    }
    let name = props.local_name.unwrap_or_default();
    Ok(name.to_lowercase().contains(&device.name.to_lowercase()))
}

/// Connect and discover the band's services.
pub async fn connect(peripheral: &Peripheral) -> Result<()> {
    if !peripheral.is_connected().await? {
        peripheral.connect().await?;
    }
    peripheral.discover_services().await?;
    info!(address = %peripheral.address(), "connected");
    Ok(())
}

/// List everything advertising nearby.
pub async fn scan(device: &DeviceConfig) -> Result<()> {
    let adapter = adapter().await?;
    adapter.start_scan(ScanFilter::default()).await?;
    tokio::time::sleep(Duration::from_secs(device.scan_timeout_secs)).await;

    let peripherals = adapter.peripherals().await?;
    adapter.stop_scan().await?;

    println!("Found {} devices:", peripherals.len());
    for peripheral in peripherals {
        if let Some(props) = peripheral.properties().await? {
            let name = props.local_name.unwrap_or_else(|| "(unknown)".to_string());
            // Bands advertise the vendor step service next to the NUS one
            let is_band = props.services.contains(&uuids::BAND_SERVICE)
                || props.services.contains(&uuids::STEP_SERVICE);
            let marker = if is_band { "  [band]" } else { "" };
            match props.rssi {
                Some(rssi) => println!("  {}  {}  {} dBm{}", props.address, name, rssi, marker),
                None => println!("  {}  {}{}", props.address, name, marker),
            }
        }
    }
    Ok(())
}

/// Transport backed by a connected btleplug peripheral.
pub struct BleTransport {
    peripheral: Peripheral,
    characteristics: HashMap<Uuid, Characteristic>,
}

impl BleTransport {
    /// Index the discovered characteristics. Call after
    /// [`connect`] so discovery has run.
    pub fn new(peripheral: Peripheral) -> Self {
        let characteristics = peripheral
            .characteristics()
            .into_iter()
            .map(|characteristic| (characteristic.uuid, characteristic))
            .collect();
        Self {
            peripheral,
            characteristics,
        }
    }

    fn characteristic(&self, uuid: Uuid) -> Result<&Characteristic, TransportError> {
        self.characteristics
            .get(&uuid)
            .ok_or(TransportError::CharacteristicUnavailable(uuid))
    }
}

#[async_trait]
impl Transport for BleTransport {
    async fn send_frame(
        &self,
        characteristic: Uuid,
        frame: &RawFrame,
    ) -> Result<(), TransportError> {
        let target = self.characteristic(characteristic)?;
        self.peripheral
            .write(target, frame.as_bytes(), WriteType::WithResponse)
            .await
            .map_err(|err| TransportError::WriteFailed(err.to_string()))
    }

    async fn subscribe_notifications(&self, characteristic: Uuid) -> Result<(), TransportError> {
        let target = self.characteristic(characteristic)?;
        self.peripheral
            .subscribe(target)
            .await
            .map_err(|err| TransportError::SubscribeFailed(err.to_string()))
    }
}

/// Forward notifications into the link until the connection drops.
pub async fn pump_notifications(peripheral: Peripheral, link: Arc<BandLink>) {
    let mut stream = match peripheral.notifications().await {
        Ok(stream) => stream,
        Err(err) => {
            warn!(error = %err, "could not open notification stream");
            return;
        }
    };
    debug!("notification pump running");
    while let Some(notification) = stream.next().await {
        link.handle_notification(notification.uuid, &notification.value);
    }
    link.handle_disconnect().await;
}
