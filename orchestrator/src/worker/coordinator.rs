use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::core::config::Config;
use crate::error::scenario::ScenarioError;
use crate::types::jobs::status_update::StatusUpdate;
use crate::types::run_status::RunStatusItem;
use crate::types::scenario::Scenario;
use crate::worker::event_handler::service::StepRunner;
use crate::worker::spec::template::apply_scenario_defaults;

/// Accepts runs and executes them in the background, stage after stage.
pub struct RunCoordinator {
    config: Arc<Config>,
    status_sender: mpsc::Sender<StatusUpdate>,
    tracker: TaskTracker,
    shutdown: CancellationToken,
}

impl RunCoordinator {
    pub fn new(config: Arc<Config>, status_sender: mpsc::Sender<StatusUpdate>, shutdown: CancellationToken) -> Self {
        Self { config, status_sender, tracker: TaskTracker::new(), shutdown }
    }

    /// Loads the scenario, checks it, persists the initial status document and starts the run.
    ///
    /// Returns the run id as soon as the document is stored. Any error returned here means no
    /// workload was created.
    pub async fn submit_run(
        &self,
        scenario_name: &str,
        overrides: &HashMap<String, String>,
    ) -> Result<Uuid, ScenarioError> {
        let item = self
            .config
            .database()
            .get_scenario_by_name(scenario_name)
            .await?
            .ok_or_else(|| ScenarioError::NotFound(scenario_name.to_string()))?;

        let mut scenario = Scenario::from_yaml(&item.definition)?;
        scenario.validate()?;
        apply_scenario_defaults(&mut scenario, overrides)?;

        let run = self.config.database().create_run_status(scenario.to_yaml()?, item.id).await?;
        info!(run_id = %run.id, scenario = %scenario_name, stages = scenario.stages.len(), "Run accepted");

        self.tracker.spawn(execute_run(
            self.config.clone(),
            run.id,
            scenario,
            self.status_sender.clone(),
            self.shutdown.clone(),
        ));
        Ok(run.id)
    }

    /// Returns the stored definition of a scenario.
    pub async fn get_scenario_definition(&self, scenario_name: &str) -> Result<String, ScenarioError> {
        self.config
            .database()
            .get_scenario_by_name(scenario_name)
            .await?
            .map(|item| item.definition)
            .ok_or_else(|| ScenarioError::NotFound(scenario_name.to_string()))
    }

    pub async fn get_run_status(&self, run_id: Uuid) -> Result<Option<RunStatusItem>, ScenarioError> {
        Ok(self.config.database().get_run_status(run_id).await?)
    }

    /// Waits for every accepted run to return. Steps stop early once the shutdown token is cancelled.
    pub async fn wait(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}

/// Runs the stages of a run in order. The steps of a stage run concurrently and the next
/// stage starts only after every one of them returned.
pub async fn execute_run(
    config: Arc<Config>,
    run_id: Uuid,
    scenario: Scenario,
    status_sender: mpsc::Sender<StatusUpdate>,
    shutdown: CancellationToken,
) {
    let stage_count = scenario.stages.len();
    for (index, stage) in scenario.stages.into_iter().enumerate() {
        if shutdown.is_cancelled() {
            warn!(run_id = %run_id, stage = index, "Shutdown requested, remaining stages not started");
            return;
        }
        info!(run_id = %run_id, stage = index, steps = stage.len(), "Starting stage");

        let mut steps = JoinSet::new();
        for job in stage {
            let runner = StepRunner::new(config.clone(), run_id, job, status_sender.clone(), shutdown.clone());
            steps.spawn(runner.run());
        }
        while let Some(joined) = steps.join_next().await {
            if let Err(e) = joined {
                error!(run_id = %run_id, stage = index, error = %e, "Step task panicked");
            }
        }
        info!(run_id = %run_id, stage = index, "Stage finished");
    }
    info!(run_id = %run_id, stages = stage_count, "Run finished");
}
