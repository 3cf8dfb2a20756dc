pub mod job;
pub mod scenario;
pub mod status;

use thiserror::Error;

use crate::core::client::database::DatabaseError;
use crate::core::client::platform::PlatformError;
use crate::core::error::OrchestratorCoreError;
use crate::error::job::JobError;
use crate::error::scenario::ScenarioError;
use crate::error::status::StatusError;

/// Result type for orchestrator operations
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

/// Error types for the orchestrator
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Database error: {0}")]
    DatabaseCoreError(#[from] DatabaseError),

    #[error("Platform error: {0}")]
    PlatformCoreError(#[from] PlatformError),

    #[error("Orchestrator Core Error: {0}")]
    OrchestratorCoreError(#[from] OrchestratorCoreError),

    #[error("Scenario error: {0}")]
    ScenarioError(#[from] ScenarioError),

    #[error("Status error: {0}")]
    StatusError(#[from] StatusError),

    #[error("Job error: {0}")]
    JobError(#[from] JobError),

    /// Run Command error
    #[error("Run Command Error: {0}")]
    RunCommandError(String),

    /// Server error
    #[error("Server error: {0}")]
    ServerError(String),
}
