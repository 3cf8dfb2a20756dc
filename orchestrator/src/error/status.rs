use thiserror::Error;
use uuid::Uuid;

use crate::core::client::database::DatabaseError;

#[derive(Error, Debug)]
pub enum StatusError {
    #[error("Failed to encode or decode run status: {0}")]
    Codec(String),

    #[error("Run status not found for run {0}")]
    RunNotFound(Uuid),

    #[error("Step {job_name} not found in run status of run {run_id}")]
    StepNotFound { run_id: Uuid, job_name: String },

    #[error("Gave up writing run status of run {run_id} after {attempts} version conflicts")]
    RetriesExhausted { run_id: Uuid, attempts: u32 },

    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
}
