pub mod pod_delete;
pub mod pod_io_stress;

use async_trait::async_trait;

use crate::types::jobs::types::JobStatus;
use crate::worker::event_handler::service::StepRunner;

/// Terminal status a handler settles a step on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub status: JobStatus,
    pub failed_reason: String,
}

impl StepOutcome {
    pub fn success() -> Self {
        Self { status: JobStatus::Success, failed_reason: String::new() }
    }

    pub fn failed(reason: impl ToString) -> Self {
        Self { status: JobStatus::Failed, failed_reason: reason.to_string() }
    }
}

/// Runs one type of step.
///
/// Implementations submit the step's workloads, report `Running` through
/// [`StepRunner::reporter`] once the platform accepted them, and return the terminal
/// outcome after the step's cleanup ran.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobHandlerTrait: Send + Sync {
    async fn run(&self, step: &StepRunner) -> StepOutcome;
}
