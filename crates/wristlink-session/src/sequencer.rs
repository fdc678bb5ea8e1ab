//! Session state machine and plan factories
//!
//! The band ignores commands sent before it has been synced, so every
//! plan factory checks where the session stands. The state only moves
//! forward; a disconnect is the one way back to the start.

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::debug;

use wristlink_proto::{command, Alarm, ClockMode, EncodingError, UserProfile, VitalKind};

use crate::plan::CommandPlan;

/// Where a session stands between connect and ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Connected, notifications not yet enabled.
    #[default]
    Uninitialized,
    /// Notifications enabled, sync sequence not yet sent.
    AwaitingSync,
    /// Sync sequence sent; the band accepts commands.
    Initialized,
}

#[derive(Debug, Error)]
pub enum SequenceError {
    #[error("notifications are not subscribed yet")]
    NotSubscribed,
    #[error("session is not initialized")]
    NotInitialized,
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// Tracks session progress and produces command plans valid for it.
#[derive(Debug, Default)]
pub struct SessionSequencer {
    state: SessionState,
}

impl SessionSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Record that notifications are enabled.
    pub fn subscribed(&mut self) {
        if self.state == SessionState::Uninitialized {
            self.advance(SessionState::AwaitingSync);
        }
    }

    /// Record that the sync sequence went out.
    pub fn synced(&mut self) {
        if self.state == SessionState::AwaitingSync {
            self.advance(SessionState::Initialized);
        }
    }

    /// Drop back to the start, after a disconnect.
    pub fn reset(&mut self) {
        if self.state != SessionState::Uninitialized {
            self.advance(SessionState::Uninitialized);
        }
    }

    fn advance(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "session state change");
        self.state = next;
    }

    /// Initial sync: date/time, then user preferences, then clock mode.
    ///
    /// The band stays mute until this sequence has been written, so it is
    /// the only plan allowed before the session is initialized.
    pub fn sync_plan(
        &self,
        profile: &UserProfile,
        clock: ClockMode,
        now: NaiveDateTime,
    ) -> Result<CommandPlan, SequenceError> {
        if self.state == SessionState::Uninitialized {
            return Err(SequenceError::NotSubscribed);
        }
        let mut plan = CommandPlan::new("sync");
        plan.push(command::set_date_time(now));
        plan.push(command::set_user_prefs(profile));
        plan.push(command::clock_mode(clock));
        Ok(plan)
    }

    pub fn date_time_plan(&self, now: NaiveDateTime) -> Result<CommandPlan, SequenceError> {
        self.require_initialized()?;
        let mut plan = CommandPlan::new("date-time");
        plan.push(command::set_date_time(now));
        Ok(plan)
    }

    pub fn profile_plan(&self, profile: &UserProfile) -> Result<CommandPlan, SequenceError> {
        self.require_initialized()?;
        let mut plan = CommandPlan::new("profile");
        plan.push(command::set_user_prefs(profile));
        Ok(plan)
    }

    pub fn clock_mode_plan(&self, mode: ClockMode) -> Result<CommandPlan, SequenceError> {
        self.require_initialized()?;
        let mut plan = CommandPlan::new("clock-mode");
        plan.push(command::clock_mode(mode));
        Ok(plan)
    }

    /// Program alarms into consecutive slots, starting at slot 1.
    pub fn alarm_plan(&self, alarms: &[Alarm]) -> Result<CommandPlan, SequenceError> {
        self.require_initialized()?;
        let mut plan = CommandPlan::new("alarms");
        for (index, alarm) in alarms.iter().enumerate() {
            let slot = (index + 1) as u8;
            plan.push(command::set_alarm(slot, alarm)?);
        }
        Ok(plan)
    }

    /// Make the band vibrate.
    ///
    /// The vendor app sends the same ring command for stop, which has
    /// not been checked on hardware, so a stop request stays an empty
    /// plan.
    pub fn find_device_plan(&self, start: bool) -> Result<CommandPlan, SequenceError> {
        self.require_initialized()?;
        let mut plan = CommandPlan::new("find-band");
        if start {
            plan.push(command::find_device());
        }
        Ok(plan)
    }

    /// One-shot measurement: switch the sensor on, hold while it runs,
    /// switch it off again.
    pub fn vital_test_plan(&self, kind: VitalKind) -> Result<CommandPlan, SequenceError> {
        self.require_initialized()?;
        let mut plan = CommandPlan::new("vital-test");
        plan.push(command::sensor_switch(kind, true));
        plan.hold(kind.measurement_window());
        plan.push(command::sensor_switch(kind, false));
        Ok(plan)
    }

    pub fn realtime_heart_rate_plan(&self, enabled: bool) -> Result<CommandPlan, SequenceError> {
        self.require_initialized()?;
        let mut plan = CommandPlan::new("realtime-heart-rate");
        plan.push(command::sensor_switch(VitalKind::HeartRate, enabled));
        Ok(plan)
    }

    fn require_initialized(&self) -> Result<(), SequenceError> {
        match self.state {
            SessionState::Initialized => Ok(()),
            _ => Err(SequenceError::NotInitialized),
        }
    }
}
