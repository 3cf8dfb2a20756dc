use std::collections::HashMap;
use std::sync::Arc;

use assert_matches::assert_matches;
use rstest::*;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::client::platform::{PodEvent, PodPhase};
use crate::core::client::DatabaseClient;
use crate::error::scenario::ScenarioError;
use crate::tests::common::fake_platform::FakePlatform;
use crate::tests::common::in_memory_database::InMemoryDatabase;
use crate::tests::common::{pod_in_phase, ready_pod, step_status, store_scenario, APP_LABEL, TWO_STAGE_SCENARIO};
use crate::tests::config::TestConfigBuilder;
use crate::tests::workers::job_label;
use crate::types::constant::{CHAOS_POD_FAILED_REASON, CHAOS_STEP_NAME_LABEL};
use crate::types::jobs::types::JobStatus;
use crate::worker::coordinator::RunCoordinator;
use crate::worker::status::status_channel;

struct CoordinatorSetup {
    coordinator: RunCoordinator,
    propagator: JoinHandle<()>,
    database: Arc<InMemoryDatabase>,
    platform: Arc<FakePlatform>,
}

fn setup(platform: FakePlatform) -> CoordinatorSetup {
    let platform = Arc::new(platform);
    let database = Arc::new(InMemoryDatabase::new());
    let config =
        TestConfigBuilder::new().configure_database(database.clone()).configure_platform(platform.clone()).build().config;
    let (sender, propagator) = status_channel(database.clone(), 16, 5);
    let coordinator = RunCoordinator::new(config, sender, CancellationToken::new());
    CoordinatorSetup { coordinator, propagator: tokio::spawn(propagator.run()), database, platform }
}

#[tokio::test]
async fn unknown_scenario_is_rejected() {
    let setup = setup(FakePlatform::new());

    let result = setup.coordinator.submit_run("missing", &HashMap::new()).await;

    assert_matches!(result, Err(ScenarioError::NotFound(name)) if name == "missing");
    assert_eq!(setup.database.run_count(), 0);
}

#[rstest]
#[case("- - name: kill\n    type: pod-delete\n  - name: kill\n    type: pod-delete\n")]
#[case("- - name: drain\n    type: node-drain\n")]
#[case("stages: nope")]
#[tokio::test]
async fn precondition_failures_create_nothing(#[case] definition: &str) {
    let setup = setup(FakePlatform::new());
    store_scenario(setup.database.as_ref(), "broken", definition).await;

    let result = setup.coordinator.submit_run("broken", &HashMap::new()).await;

    assert_matches!(
        result,
        Err(ScenarioError::DuplicateStepName(_) | ScenarioError::UnsupportedType(_) | ScenarioError::MalformedDefinition(_))
    );
    assert_eq!(setup.database.run_count(), 0);
    assert!(setup.platform.created_jobs().is_empty());
}

#[tokio::test]
async fn initial_document_is_pending_with_defaults_and_overrides() {
    let setup = setup(FakePlatform::new());
    let scenario = store_scenario(setup.database.as_ref(), "checkout", TWO_STAGE_SCENARIO).await;
    let overrides = HashMap::from([
        ("kill-checkout-TOTAL_CHAOS_DURATION".to_string(), "42".to_string()),
        ("kill-checkout-NOT_A_KEY".to_string(), "ignored".to_string()),
    ]);

    let run_id = setup.coordinator.submit_run("checkout", &overrides).await.unwrap();

    let item = setup.database.get_run_status(run_id).await.unwrap().unwrap();
    assert_eq!(item.scenario_id, scenario.id);
    assert_eq!(item.version, 0);
    let tree = item.tree().unwrap();
    assert!(tree.jobs().all(|job| job.status == JobStatus::Pending && !job.image.is_empty()));
    let kill = tree.jobs().find(|job| job.name == "kill-checkout").unwrap();
    assert_eq!(kill.config.get("TOTAL_CHAOS_DURATION").map(String::as_str), Some("42"));
    assert!(!kill.config.contains_key("NOT_A_KEY"));
}

#[tokio::test]
async fn scenario_definition_is_returned_verbatim() {
    let setup = setup(FakePlatform::new());
    store_scenario(setup.database.as_ref(), "checkout", TWO_STAGE_SCENARIO).await;

    assert_eq!(setup.coordinator.get_scenario_definition("checkout").await.unwrap(), TWO_STAGE_SCENARIO);
    assert_matches!(setup.coordinator.get_scenario_definition("nope").await, Err(ScenarioError::NotFound(_)));
}

#[rstest]
#[case(PodPhase::Succeeded, JobStatus::Success, "")]
#[case(PodPhase::Failed, JobStatus::Failed, CHAOS_POD_FAILED_REASON)]
#[tokio::test(start_paused = true)]
async fn stages_run_in_order_and_end_without_workloads(
    #[case] chaos_phase: PodPhase,
    #[case] first_status: JobStatus,
    #[case] first_reason: &str,
) {
    let platform = FakePlatform::new();
    platform.script_chaos_pod(vec![Ok(PodEvent::Modified(pod_in_phase("kill-checkout-pod", chaos_phase)))], false);
    for name in ["checkout-1", "checkout-2", "checkout-3"] {
        platform.add_pod(APP_LABEL, ready_pod(name));
    }
    let setup = setup(platform);
    store_scenario(setup.database.as_ref(), "checkout", TWO_STAGE_SCENARIO).await;

    let run_id = setup.coordinator.submit_run("checkout", &HashMap::new()).await.unwrap();
    setup.coordinator.wait().await;
    drop(setup.coordinator);
    setup.propagator.await.unwrap();

    let steps = step_status(setup.database.as_ref(), run_id).await;
    assert_eq!(steps[0], ("kill-checkout".to_string(), first_status, first_reason.to_string()));
    assert_eq!(steps[1], ("stress-checkout".to_string(), JobStatus::Success, String::new()));

    let order: Vec<String> =
        setup.platform.created_jobs().iter().filter_map(|job| job_label(job, CHAOS_STEP_NAME_LABEL)).collect();
    assert_eq!(order, vec!["kill-checkout".to_string(), "stress-checkout".to_string()]);
    assert!(setup.platform.live_jobs().is_empty());
}
