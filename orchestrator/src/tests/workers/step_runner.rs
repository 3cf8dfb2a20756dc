use assert_matches::assert_matches;
use rstest::*;
use tokio_util::sync::CancellationToken;

use super::{stress_step, StepHarness};
use crate::core::client::PlatformClient;
use crate::error::job::JobError;
use crate::tests::common::fake_platform::FakePlatform;
use crate::tests::config::TEST_JOB_NAMESPACE;
use crate::worker::event_handler::service::StepRunner;
use crate::worker::spec::build_litmus_job;
use crate::worker::status::status_channel;

/// A step runner over `platform` with two workloads of its run already submitted.
async fn runner_with_workloads(platform: FakePlatform) -> (StepHarness, StepRunner) {
    let harness = StepHarness::new(stress_step(&[]), platform).await;
    for _ in 0..2 {
        let workload = build_litmus_job(&harness.job, harness.run_id, TEST_JOB_NAMESPACE);
        harness.platform.create_job(TEST_JOB_NAMESPACE, workload).await.unwrap();
    }
    let (sender, _propagator) = status_channel(harness.database.clone(), 8, 5);
    let runner = StepRunner::new(harness.config.clone(), harness.run_id, harness.job.clone(), sender, CancellationToken::new());
    (harness, runner)
}

#[rstest]
#[tokio::test]
async fn cleanup_reaches_the_platform_once() {
    let (harness, runner) = runner_with_workloads(FakePlatform::new()).await;

    runner.cleanup().await.unwrap();
    runner.cleanup().await.unwrap();

    assert_eq!(harness.platform.list_job_calls(), 1);
    assert_eq!(harness.platform.deleted_jobs().len(), 2);
    assert!(harness.platform.live_jobs().is_empty());
}

#[rstest]
#[tokio::test]
async fn failed_cleanup_is_not_retried() {
    let platform = FakePlatform::new();
    platform.fail_job_deletion();
    let (harness, runner) = runner_with_workloads(platform).await;

    assert_matches!(runner.cleanup().await, Err(JobError::CleanupFailed { .. }));
    assert_matches!(runner.cleanup().await, Err(JobError::CleanupFailed { reason, .. }) if reason.contains("leader changed"));

    assert_eq!(harness.platform.list_job_calls(), 1);
    assert_eq!(harness.platform.live_jobs().len(), 2);
}
