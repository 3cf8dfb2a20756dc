use std::collections::HashMap;

use rstest::*;
use tokio_util::sync::CancellationToken;

use super::StepHarness;
use crate::core::client::platform::{PlatformError, PodEvent, PodPhase};
use crate::tests::common::fake_platform::FakePlatform;
use crate::tests::common::{at_version, pod_in_phase};
use crate::types::constant::CHAOS_POD_FAILED_REASON;
use crate::types::jobs::chaos_job::ChaosJob;
use crate::types::jobs::types::{ChaosJobType, JobStatus};
use crate::worker::spec::step_selector;
use crate::worker::spec::template::apply_defaults;

fn pod_delete_step() -> ChaosJob {
    let mut job = ChaosJob::new("kill-checkout", ChaosJobType::PodDelete).with_config("APP_LABEL", "app=checkout");
    apply_defaults(&mut job, &HashMap::new()).unwrap();
    job
}

const CHAOS_POD: &str = "kill-checkout-abcdefghij-x7k2p";

fn chaos_pod(phase: PodPhase) -> Result<PodEvent, PlatformError> {
    Ok(PodEvent::Modified(pod_in_phase(CHAOS_POD, phase)))
}

fn chaos_pod_at(phase: PodPhase, resource_version: &str) -> Result<PodEvent, PlatformError> {
    Ok(PodEvent::Modified(at_version(pod_in_phase(CHAOS_POD, phase), resource_version)))
}

#[rstest]
#[case(PodPhase::Succeeded, JobStatus::Success, "")]
#[case(PodPhase::Failed, JobStatus::Failed, CHAOS_POD_FAILED_REASON)]
#[tokio::test]
async fn terminal_chaos_pod_settles_the_step_and_removes_the_job(
    #[case] phase: PodPhase,
    #[case] status: JobStatus,
    #[case] reason: &str,
) {
    let platform = FakePlatform::new();
    platform.script_chaos_pod(vec![chaos_pod(PodPhase::Pending), chaos_pod(PodPhase::Running), chaos_pod(phase)], false);
    let harness = StepHarness::new(pod_delete_step(), platform).await;

    assert_eq!(harness.run().await, (status, reason.to_string()));
    assert_eq!(harness.platform.created_jobs().len(), 1);
    assert!(harness.platform.live_jobs().is_empty());
}

#[tokio::test]
async fn rejected_job_fails_without_cleanup() {
    let platform = FakePlatform::new();
    platform.fail_job_creation();
    let harness = StepHarness::new(pod_delete_step(), platform).await;

    let (status, reason) = harness.run().await;

    assert_eq!(status, JobStatus::Failed);
    assert!(reason.contains("admission webhook denied"));
    assert!(harness.platform.created_jobs().is_empty());
    assert!(harness.platform.deleted_jobs().is_empty());
}

#[tokio::test(start_paused = true)]
async fn chaos_pod_outliving_the_watch_is_followed_on_a_reopened_watch() {
    let platform = FakePlatform::new();
    platform.script_chaos_pod(vec![chaos_pod_at(PodPhase::Running, "11")], true);
    platform.script_chaos_pod(vec![chaos_pod(PodPhase::Succeeded)], false);
    let harness = StepHarness::new(pod_delete_step(), platform).await;

    assert_eq!(harness.run().await, (JobStatus::Success, String::new()));

    let selector = step_selector(harness.run_id, "kill-checkout");
    assert_eq!(harness.platform.watch_versions(&selector), vec!["0".to_string(), "11".to_string()]);
    assert_eq!(harness.platform.created_jobs().len(), 1);
    assert_eq!(harness.platform.deleted_jobs().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn expired_watch_restarts_from_the_current_state() {
    let platform = FakePlatform::new();
    platform.script_chaos_pod(
        vec![chaos_pod_at(PodPhase::Running, "11"), Err(PlatformError::WatchExpired("too old resource version".to_string()))],
        false,
    );
    platform.script_chaos_pod(vec![Ok(PodEvent::Added(pod_in_phase(CHAOS_POD, PodPhase::Failed)))], false);
    let harness = StepHarness::new(pod_delete_step(), platform).await;

    assert_eq!(harness.run().await, (JobStatus::Failed, CHAOS_POD_FAILED_REASON.to_string()));

    let selector = step_selector(harness.run_id, "kill-checkout");
    assert_eq!(harness.platform.watch_versions(&selector), vec!["0".to_string(), "0".to_string()]);
}

#[tokio::test]
async fn cleanup_failure_overrides_a_succeeded_chaos_pod() {
    let platform = FakePlatform::new();
    platform.script_chaos_pod(vec![chaos_pod(PodPhase::Succeeded)], false);
    platform.fail_job_deletion();
    let harness = StepHarness::new(pod_delete_step(), platform).await;

    let (status, reason) = harness.run().await;

    assert_eq!(status, JobStatus::Failed);
    assert!(reason.starts_with("Failed to clean up workloads"));
    assert!(reason.contains("leader changed"));
    assert_eq!(harness.platform.live_jobs().len(), 1);
}

#[tokio::test]
async fn watch_error_fails_the_step_after_cleanup() {
    let platform = FakePlatform::new();
    platform.script_chaos_pod(vec![Err(PlatformError::WatchError("gone".to_string()))], false);
    let harness = StepHarness::new(pod_delete_step(), platform).await;

    let (status, reason) = harness.run().await;

    assert_eq!(status, JobStatus::Failed);
    assert!(reason.contains("gone"));
    assert_eq!(harness.platform.deleted_jobs().len(), 1);
}

#[tokio::test]
async fn shutdown_cleans_up_a_running_step() {
    let harness = StepHarness::new(pod_delete_step(), FakePlatform::new()).await;
    let shutdown = CancellationToken::new();
    let handle = harness.spawn(shutdown.clone());

    harness.wait_for_watch(&step_selector(harness.run_id, "kill-checkout")).await;
    assert_eq!(harness.platform.live_jobs().len(), 1);
    shutdown.cancel();
    handle.await.unwrap();

    assert_eq!(harness.status().await, (JobStatus::Failed, "step cancelled by shutdown".to_string()));
    assert!(harness.platform.live_jobs().is_empty());
}
