use super::client::{database::DatabaseError, platform::PlatformError};
use thiserror::Error;

pub type OrchestratorCoreResult<T> = Result<T, OrchestratorCoreError>;

#[derive(Error, Debug)]
pub enum OrchestratorCoreError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("Platform error: {0}")]
    PlatformError(#[from] PlatformError),
}
