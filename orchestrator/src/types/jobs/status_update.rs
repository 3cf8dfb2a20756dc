use crate::types::jobs::types::JobStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A status transition emitted by a step runner for the status propagator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub run_id: Uuid,
    pub job_name: String,
    pub status: JobStatus,
    pub failed_reason: String,
}

impl StatusUpdate {
    pub fn new(run_id: Uuid, job_name: impl Into<String>, status: JobStatus) -> Self {
        Self { run_id, job_name: job_name.into(), status, failed_reason: String::new() }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.failed_reason = reason.into();
        self
    }
}
