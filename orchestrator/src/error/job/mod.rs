use thiserror::Error;

use crate::core::client::platform::PlatformError;

pub type JobResult<T> = Result<T, JobError>;

/// Errors that end a single step. They never abort sibling steps or the run.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Platform error: {0}")]
    PlatformError(#[from] PlatformError),

    /// Deleting the workloads of a run failed. Overrides whatever the step was about to report.
    #[error("Failed to clean up workloads of run {run_id}: {reason}")]
    CleanupFailed { run_id: String, reason: String },

    #[error("Invalid value {value:?} for config key {key}")]
    InvalidConfigValue { key: String, value: String },

    #[error("No eligible pods in namespace {namespace} matching {label:?}")]
    NoEligiblePods { namespace: String, label: String },

    /// An explicitly named target pod could not be resolved
    #[error("Failed to find target pod {name} in namespace {namespace}: {reason}")]
    TargetPodNotFound { name: String, namespace: String, reason: String },

    #[error("Unsupported chaos job type: {0}")]
    UnsupportedType(String),
}
