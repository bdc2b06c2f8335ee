use super::step::StepRecord;
use crate::error::WorkflowError;
use crate::graph::GraphSnapshot;
use serde::Serialize;

/// Everything one action did: the steps that ran, the graphs rendered after
/// each state change, and the failure that stopped it, if any.
///
/// Snapshots are present on failure paths too, so a caller always sees the
/// repository as it was left.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowReport {
    pub action: &'static str,
    pub steps: Vec<StepRecord>,
    pub snapshots: Vec<GraphSnapshot>,
    pub error: Option<WorkflowError>,
}

impl WorkflowReport {
    pub fn new(action: &'static str) -> Self {
        Self {
            action,
            steps: Vec::new(),
            snapshots: Vec::new(),
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn last_snapshot(&self) -> Option<&GraphSnapshot> {
        self.snapshots.last()
    }

    /// Names of the recorded steps, in order
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|record| record.step.as_str()).collect()
    }
}
