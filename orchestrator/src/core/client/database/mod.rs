pub mod constant;
pub mod error;
pub mod mongodb;

use crate::types::run_status::RunStatusItem;
use crate::types::scenario::ScenarioItem;
use async_trait::async_trait;
pub use error::DatabaseError;
use uuid::Uuid;

/// Trait defining database operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// get_scenario_by_name - Get a scenario definition by its name
    async fn get_scenario_by_name(&self, name: &str) -> Result<Option<ScenarioItem>, DatabaseError>;
    /// create_scenario - Store a new scenario definition. Fails if the name is taken.
    async fn create_scenario(&self, scenario: ScenarioItem) -> Result<ScenarioItem, DatabaseError>;

    /// create_run_status - Persist the initial status tree of a run. The returned item's id is the run id.
    async fn create_run_status(&self, status: String, scenario_id: Uuid) -> Result<RunStatusItem, DatabaseError>;
    /// get_run_status - Get the status document of a run
    async fn get_run_status(&self, run_id: Uuid) -> Result<Option<RunStatusItem>, DatabaseError>;
    /// update_run_status - Replace the status tree of a run if its version still matches `current`.
    /// Returns `DatabaseError::VersionConflict` otherwise.
    async fn update_run_status(&self, current: &RunStatusItem, status: String) -> Result<RunStatusItem, DatabaseError>;
}
