use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{error, info};

use crate::error::job::{JobError, JobResult};
use crate::worker::event_handler::jobs::{JobHandlerTrait, StepOutcome};
use crate::worker::event_handler::service::StepRunner;
use crate::worker::reconcile::{PodTargetSet, ReconcileLoop, StressLauncher};
use crate::worker::target::{select_targets, StressSettings};
use crate::worker::watch::PodWatch;

/// Keeps a share of the application pods under io stress for the configured duration.
///
/// The reconcile loop runs until the deadline, across watch reopens, and the step's cleanup
/// runs once afterwards.
pub struct PodIoStressJobHandler;

impl PodIoStressJobHandler {
    /// Selects targets and launches the initial workloads.
    /// Returns the seeded target set, or the error and whether workloads may exist.
    async fn launch_initial(
        step: &StepRunner,
        settings: &StressSettings,
        launcher: &StressLauncher,
    ) -> Result<PodTargetSet, (JobError, bool)> {
        let selection =
            select_targets(step.config().platform().as_ref(), settings).await.map_err(|e| (e, false))?;
        let mut launched = Vec::with_capacity(selection.selected.len());
        for pod in &selection.selected {
            launcher.launch(pod, None).await.map_err(|e| (e, true))?;
            launched.push(pod.name.clone());
        }
        let observed = selection.candidates.into_iter().map(|pod| pod.name);
        Ok(PodTargetSet::new(launched, observed))
    }

    async fn reconcile(
        step: &StepRunner,
        settings: &StressSettings,
        launcher: StressLauncher,
        targets: PodTargetSet,
        deadline: Instant,
    ) -> JobResult<PodTargetSet> {
        let watch = PodWatch::open(step.config().platform().clone(), &settings.namespace, &settings.label).await?;
        info!(run_id = %step.run_id(), job_name = %step.job().name, label = %settings.label, "Watching application pods");
        ReconcileLoop::new(launcher, targets, settings.percentage, deadline).run(watch).await
    }
}

#[async_trait]
impl JobHandlerTrait for PodIoStressJobHandler {
    async fn run(&self, step: &StepRunner) -> StepOutcome {
        let job = step.job();
        let settings = match StressSettings::from_job(job) {
            Ok(settings) => settings,
            Err(e) => return StepOutcome::failed(e),
        };
        let deadline = match settings.deadline(Instant::now()) {
            Ok(deadline) => deadline,
            Err(e) => return StepOutcome::failed(e),
        };
        let launcher =
            StressLauncher::new(step.config().platform().clone(), job.clone(), step.run_id(), step.config().job_namespace());

        info!(run_id = %step.run_id(), job_name = %job.name, settings = ?settings, "Starting stress step");
        let targets = match Self::launch_initial(step, &settings, &launcher).await {
            Ok(targets) => targets,
            Err((e, false)) => {
                error!(run_id = %step.run_id(), job_name = %job.name, error = %e, "Target selection failed");
                return StepOutcome::failed(e);
            }
            Err((e, true)) => {
                error!(run_id = %step.run_id(), job_name = %job.name, error = %e, "Stress workload creation failed");
                return step.finish_with_cleanup(StepOutcome::failed(e)).await;
            }
        };
        step.reporter().running().await;

        match Self::reconcile(step, &settings, launcher, targets, deadline).await {
            Ok(targets) => {
                info!(run_id = %step.run_id(), job_name = %job.name, active = targets.active().len(), "Stress duration elapsed");
                step.finish_with_cleanup(StepOutcome::success()).await
            }
            Err(e) => {
                error!(run_id = %step.run_id(), job_name = %job.name, error = %e, "Stress step failed");
                step.finish_with_cleanup(StepOutcome::failed(e)).await
            }
        }
    }
}
