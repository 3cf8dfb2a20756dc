use assert_matches::assert_matches;
use rstest::*;

use crate::error::scenario::ScenarioError;
use crate::tests::common::two_stage_scenario;
use crate::types::jobs::types::{ChaosJobType, JobStatus};
use crate::types::scenario::Scenario;

#[rstest]
fn unquoted_config_scalars_are_kept_as_text(two_stage_scenario: Scenario) {
    let stress = two_stage_scenario.jobs().find(|job| job.name == "stress-checkout").unwrap();
    assert_eq!(stress.job_type, ChaosJobType::PodIoStress);
    assert_eq!(stress.config.get("PODS_AFFECTED_PERC").map(String::as_str), Some("0"));
    assert_eq!(stress.config.get("TOTAL_CHAOS_DURATION").map(String::as_str), Some("5"));
    assert_eq!(stress.status, JobStatus::Pending);
}

#[rstest]
fn stages_keep_their_order(two_stage_scenario: Scenario) {
    let names: Vec<Vec<&str>> =
        two_stage_scenario.stages.iter().map(|stage| stage.iter().map(|job| job.name.as_str()).collect()).collect();
    assert_eq!(names, vec![vec!["kill-checkout"], vec!["stress-checkout"]]);
}

#[rstest]
fn unknown_type_survives_parsing_and_fails_validation() {
    let scenario = Scenario::from_yaml("- - name: drain\n    type: node-drain\n").unwrap();
    assert_eq!(scenario.stages[0][0].job_type, ChaosJobType::Unsupported("node-drain".to_string()));
    assert_matches!(scenario.validate(), Err(ScenarioError::UnsupportedType(name)) if name == "node-drain");
}

#[rstest]
fn duplicate_names_across_stages_fail_validation() {
    let scenario = Scenario::from_yaml(
        "- - name: kill\n    type: pod-delete\n- - name: kill\n    type: pod-delete\n",
    )
    .unwrap();
    assert_matches!(scenario.validate(), Err(ScenarioError::DuplicateStepName(name)) if name == "kill");
}

#[rstest]
#[case("not: [a, list")]
#[case("name: lonely-step")]
fn malformed_definitions_are_rejected(#[case] definition: &str) {
    assert_matches!(Scenario::from_yaml(definition), Err(ScenarioError::MalformedDefinition(_)));
}

#[rstest]
#[case(JobStatus::Pending, JobStatus::Running, true)]
#[case(JobStatus::Pending, JobStatus::Failed, true)]
#[case(JobStatus::Running, JobStatus::Success, true)]
#[case(JobStatus::Running, JobStatus::Unknown, true)]
#[case(JobStatus::Success, JobStatus::Failed, true)]
#[case(JobStatus::Running, JobStatus::Running, false)]
#[case(JobStatus::Running, JobStatus::Pending, false)]
#[case(JobStatus::Failed, JobStatus::Success, false)]
#[case(JobStatus::Unknown, JobStatus::Running, false)]
#[case(JobStatus::Success, JobStatus::Running, false)]
fn status_guard(#[case] from: JobStatus, #[case] to: JobStatus, #[case] allowed: bool) {
    assert_eq!(from.can_transition_to(to), allowed);
}

#[rstest]
fn status_tree_round_trips_through_yaml(mut two_stage_scenario: Scenario) {
    let job = two_stage_scenario.find_job_mut("kill-checkout").unwrap();
    job.status = JobStatus::Failed;
    job.failed_reason = "chaos job pod running failed".to_string();

    let yaml = two_stage_scenario.to_yaml().unwrap();
    assert!(yaml.contains("status: failed"));
    assert_eq!(Scenario::from_yaml(&yaml).unwrap(), two_stage_scenario);
}
