//! Link driver for a connected band
//!
//! `BandLink` owns the session sequencer for one connection, serializes
//! all frame writes through a single gate, and fans decoded reports out
//! to any number of subscribers. The gate stays held across a plan's
//! holds, so a running measurement cannot be interleaved with other
//! writes.

use chrono::Local;
use thiserror::Error;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, info, trace};
use uuid::Uuid;

use wristlink_proto::{
    decode_event, uuids, Alarm, ClockMode, DeviceEvent, UserProfile, VitalKind,
};

use crate::plan::{CommandPlan, PlanStep};
use crate::sequencer::{SequenceError, SessionSequencer, SessionState};
use crate::transport::{TransportError, TransportHandle};

const EVENT_BUFFER: usize = 32;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Driver for one band connection.
pub struct BandLink {
    transport: TransportHandle,
    sequencer: RwLock<SessionSequencer>,
    write_gate: Mutex<()>,
    events: broadcast::Sender<DeviceEvent>,
}

impl BandLink {
    pub fn new(transport: TransportHandle) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            transport,
            sequencer: RwLock::new(SessionSequencer::new()),
            write_gate: Mutex::new(()),
            events,
        }
    }

    /// Receiver for decoded reports. Every subscriber sees every event.
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.events.subscribe()
    }

    pub async fn state(&self) -> SessionState {
        self.sequencer.read().await.state()
    }

    /// Bring a fresh connection up to ready: enable notifications, then
    /// write the sync sequence.
    pub async fn initialize(
        &self,
        profile: &UserProfile,
        clock: ClockMode,
    ) -> Result<(), LinkError> {
        self.transport
            .subscribe_notifications(uuids::MEASURE_CHARACTERISTIC)
            .await?;
        self.sequencer.write().await.subscribed();

        let now = Local::now().naive_local();
        let plan = self.sequencer.read().await.sync_plan(profile, clock, now)?;
        self.execute(plan).await?;

        self.sequencer.write().await.synced();
        info!("band session initialized");
        Ok(())
    }

    /// Push the current local time to the band.
    pub async fn sync_time(&self) -> Result<(), LinkError> {
        let now = Local::now().naive_local();
        let plan = self.sequencer.read().await.date_time_plan(now)?;
        self.execute(plan).await
    }

    pub async fn set_profile(&self, profile: &UserProfile) -> Result<(), LinkError> {
        let plan = self.sequencer.read().await.profile_plan(profile)?;
        self.execute(plan).await
    }

    pub async fn set_clock_mode(&self, mode: ClockMode) -> Result<(), LinkError> {
        let plan = self.sequencer.read().await.clock_mode_plan(mode)?;
        self.execute(plan).await
    }

    pub async fn set_alarms(&self, alarms: &[Alarm]) -> Result<(), LinkError> {
        let plan = self.sequencer.read().await.alarm_plan(alarms)?;
        self.execute(plan).await
    }

    /// Start or stop the band's find-me vibration.
    pub async fn find_band(&self, start: bool) -> Result<(), LinkError> {
        let plan = self.sequencer.read().await.find_device_plan(start)?;
        self.execute(plan).await
    }

    /// Run a one-shot measurement. Holds the write gate for the whole
    /// measurement window; results arrive as events while it runs. There
    /// is no cancellation, the gate releases when the window ends.
    pub async fn run_vital_test(&self, kind: VitalKind) -> Result<(), LinkError> {
        let plan = self.sequencer.read().await.vital_test_plan(kind)?;
        self.execute(plan).await
    }

    pub async fn set_realtime_heart_rate(&self, enabled: bool) -> Result<(), LinkError> {
        let plan = self.sequencer.read().await.realtime_heart_rate_plan(enabled)?;
        self.execute(plan).await
    }

    /// Feed one raw notification from the BLE stack.
    pub fn handle_notification(&self, characteristic: Uuid, bytes: &[u8]) {
        if characteristic != uuids::MEASURE_CHARACTERISTIC
            && characteristic != uuids::STEP_MEASURE_CHARACTERISTIC
        {
            trace!(%characteristic, "notification from unexpected characteristic");
            return;
        }
        if let Some(event) = decode_event(bytes) {
            if let DeviceEvent::Unhandled { code } = event {
                debug!(code, "unhandled report");
            }
            // Send fails only when nobody is listening
            let _ = self.events.send(event);
        }
    }

    /// Reset session state after the connection dropped. The next
    /// connection must run [`BandLink::initialize`] again.
    pub async fn handle_disconnect(&self) {
        self.sequencer.write().await.reset();
        info!("band disconnected, session reset");
    }

    async fn execute(&self, plan: CommandPlan) -> Result<(), LinkError> {
        let _gate = self.write_gate.lock().await;
        debug!(plan = plan.label(), steps = plan.len(), "executing plan");
        for step in plan.iter() {
            match step {
                PlanStep::Write(frame) => {
                    trace!(frame = %frame, "write");
                    self.transport
                        .send_frame(uuids::CONTROL_CHARACTERISTIC, frame)
                        .await?;
                }
                PlanStep::Hold(duration) => {
                    debug!(plan = plan.label(), secs = duration.as_secs(), "holding");
                    tokio::time::sleep(*duration).await;
                }
            }
        }
        Ok(())
    }
}
