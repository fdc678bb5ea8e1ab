//! Command plans
//!
//! A plan is the unit of work the link driver executes: an ordered list
//! of frames to write, with holds where the band needs time between
//! them. Plans are built up front so the whole sequence can run under
//! one write gate.

use std::time::Duration;

use wristlink_proto::RawFrame;

/// One step of a command plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStep {
    /// Write a frame to the control characteristic.
    Write(RawFrame),
    /// Keep the gate held without writing, e.g. while a measurement runs.
    Hold(Duration),
}

/// Ordered sequence of writes and holds, executed atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPlan {
    label: &'static str,
    steps: Vec<PlanStep>,
}

impl CommandPlan {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            steps: Vec::new(),
        }
    }

    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn push(&mut self, frame: RawFrame) {
        self.steps.push(PlanStep::Write(frame));
    }

    pub fn hold(&mut self, duration: Duration) {
        self.steps.push(PlanStep::Hold(duration));
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlanStep> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
