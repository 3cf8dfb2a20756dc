use async_trait::async_trait;
use tracing::{error, info};

use crate::core::client::platform::PodPhase;
use crate::types::constant::CHAOS_POD_FAILED_REASON;
use crate::worker::event_handler::jobs::{JobHandlerTrait, StepOutcome};
use crate::worker::event_handler::service::StepRunner;
use crate::worker::spec::{build_litmus_job, step_selector};
use crate::worker::watch::PodWatch;

/// Runs a litmus `pod-delete` experiment as one workload and waits for its pod to finish.
///
/// There is no timeout: a chaos pod that never reaches a terminal phase keeps the step running,
/// across as many watch reopens as it takes.
pub struct PodDeleteJobHandler;

#[async_trait]
impl JobHandlerTrait for PodDeleteJobHandler {
    async fn run(&self, step: &StepRunner) -> StepOutcome {
        let config = step.config();
        let job = step.job();
        let namespace = config.job_namespace();

        info!(run_id = %step.run_id(), job_name = %job.name, "Creating chaos job");
        let workload = build_litmus_job(job, step.run_id(), namespace);
        if let Err(e) = config.platform().create_job(namespace, workload).await {
            error!(run_id = %step.run_id(), job_name = %job.name, error = %e, "Chaos job creation failed");
            return StepOutcome::failed(e);
        }
        step.reporter().running().await;

        let selector = step_selector(step.run_id(), &job.name);
        let mut watch = match PodWatch::open(config.platform().clone(), namespace, selector.as_str()).await {
            Ok(watch) => watch,
            Err(e) => {
                error!(run_id = %step.run_id(), job_name = %job.name, error = %e, "Chaos pod watch failed");
                return step.finish_with_cleanup(StepOutcome::failed(e)).await;
            }
        };
        info!(run_id = %step.run_id(), job_name = %job.name, selector = %selector, "Watching chaos pod");

        loop {
            let event = match watch.next().await {
                Ok(event) => event,
                Err(e) => {
                    error!(run_id = %step.run_id(), job_name = %job.name, error = %e, "Chaos pod watch errored");
                    return step.finish_with_cleanup(StepOutcome::failed(e)).await;
                }
            };
            let pod = event.pod();
            let outcome = match pod.phase {
                PodPhase::Succeeded => StepOutcome::success(),
                PodPhase::Failed => StepOutcome::failed(CHAOS_POD_FAILED_REASON),
                _ => continue,
            };
            info!(run_id = %step.run_id(), job_name = %job.name, pod = %pod.name, phase = %pod.phase, "Chaos pod finished");
            return step.finish_with_cleanup(outcome).await;
        }
    }
}
