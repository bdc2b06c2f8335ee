//! Workflow orchestration
//!
//! A [`WorkflowAction`] runs as an ordered series of [`Step`]s against a
//! [`crate::git::CommandRunner`]. Each state-changing step is followed by a
//! graph render, and the whole run is summarized in a [`WorkflowReport`].

pub mod action;
pub mod orchestrator;
pub mod report;
pub mod step;

pub use action::WorkflowAction;
pub use orchestrator::{WorkflowOrchestrator, WorkflowSettings};
pub use report::WorkflowReport;
pub use step::{Step, StepRecord, StepStatus};
