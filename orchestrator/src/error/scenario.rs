use thiserror::Error;

use crate::core::client::database::DatabaseError;

/// Errors raised before any workload of a run is created.
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Scenario not found: {0}")]
    NotFound(String),

    #[error("Malformed scenario definition: {0}")]
    MalformedDefinition(String),

    #[error("Duplicate step name: {0}")]
    DuplicateStepName(String),

    #[error("Unsupported chaos job type: {0}")]
    UnsupportedType(String),

    #[error("Invalid built-in template: {0}")]
    InvalidTemplate(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
}
