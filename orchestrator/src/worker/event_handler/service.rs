use std::sync::Arc;

use tokio::sync::{mpsc, OnceCell};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::core::client::platform::PlatformClient;
use crate::core::config::Config;
use crate::error::job::{JobError, JobResult};
use crate::types::jobs::chaos_job::ChaosJob;
use crate::types::jobs::status_update::StatusUpdate;
use crate::worker::event_handler::factory;
use crate::worker::event_handler::jobs::StepOutcome;
use crate::worker::spec::run_selector;
use crate::worker::status::reporter::StatusReporter;

/// Deletes every workload labeled with `run_id`, foreground propagation.
pub async fn cleanup_run(platform: &dyn PlatformClient, namespace: &str, run_id: Uuid) -> JobResult<usize> {
    let jobs = platform.list_jobs(namespace, &run_selector(run_id)).await?;
    let mut deleted = 0;
    for job in jobs {
        let Some(name) = job.metadata.name else {
            warn!(run_id = %run_id, "Skipping workload without a name");
            continue;
        };
        platform.delete_job(namespace, &name).await?;
        deleted += 1;
    }
    Ok(deleted)
}

/// Supervises one step of a run from dispatch to its terminal status.
pub struct StepRunner {
    config: Arc<Config>,
    run_id: Uuid,
    job: ChaosJob,
    reporter: StatusReporter,
    cleanup: OnceCell<Result<usize, String>>,
    shutdown: CancellationToken,
}

impl StepRunner {
    pub fn new(
        config: Arc<Config>,
        run_id: Uuid,
        job: ChaosJob,
        status_sender: mpsc::Sender<StatusUpdate>,
        shutdown: CancellationToken,
    ) -> Self {
        let reporter = StatusReporter::new(status_sender, run_id, job.name.clone());
        Self { config, run_id, job, reporter, cleanup: OnceCell::new(), shutdown }
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn job(&self) -> &ChaosJob {
        &self.job
    }

    pub fn reporter(&self) -> &StatusReporter {
        &self.reporter
    }

    /// Removes the run's workloads. Only the first call reaches the platform, later calls
    /// return the first result.
    pub async fn cleanup(&self) -> JobResult<()> {
        let result = self
            .cleanup
            .get_or_init(|| async {
                info!(run_id = %self.run_id, job_name = %self.job.name, "Starting cleanup");
                cleanup_run(self.config.platform().as_ref(), self.config.job_namespace(), self.run_id)
                    .await
                    .map_err(|e| e.to_string())
            })
            .await;
        match result {
            Ok(deleted) => {
                info!(run_id = %self.run_id, job_name = %self.job.name, deleted, "Cleanup done");
                Ok(())
            }
            Err(reason) => Err(JobError::CleanupFailed { run_id: self.run_id.to_string(), reason: reason.clone() }),
        }
    }

    /// Runs cleanup and keeps `outcome` unless cleanup fails, which turns it into a failure.
    pub async fn finish_with_cleanup(&self, outcome: StepOutcome) -> StepOutcome {
        match self.cleanup().await {
            Ok(()) => outcome,
            Err(e) => {
                error!(run_id = %self.run_id, job_name = %self.job.name, error = %e, "Cleanup failed");
                StepOutcome::failed(e)
            }
        }
    }

    /// Drives the step to a terminal status and reports it.
    pub async fn run(self) {
        info!(run_id = %self.run_id, job_name = %self.job.name, job_type = %self.job.job_type, "Step dispatched");

        let outcome = match factory::get_job_handler(&self.job.job_type) {
            Ok(handler) => {
                tokio::select! {
                    outcome = handler.run(&self) => outcome,
                    _ = self.shutdown.cancelled() => {
                        warn!(run_id = %self.run_id, job_name = %self.job.name, "Shutdown requested, stopping step");
                        self.finish_with_cleanup(StepOutcome::failed("step cancelled by shutdown")).await
                    }
                }
            }
            Err(e) => StepOutcome::failed(e),
        };

        info!(
            run_id = %self.run_id,
            job_name = %self.job.name,
            status = %outcome.status,
            failed_reason = %outcome.failed_reason,
            "Step finished"
        );
        self.reporter.report(outcome.status, outcome.failed_reason).await;
    }
}
