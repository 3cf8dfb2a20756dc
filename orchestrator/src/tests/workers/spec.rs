use std::collections::{BTreeMap, HashMap};

use assert_matches::assert_matches;
use rstest::*;
use uuid::Uuid;

use super::{container_env, job_label, stress_step};
use crate::error::job::JobError;
use crate::tests::common::ready_pod;
use crate::types::constant::{
    CHAOS_JOB_LABEL, CHAOS_RUN_ID_LABEL, CHAOS_STEP_NAME_LABEL, CHAOS_TARGET_POD_LABEL, JOB_NAME_SUFFIX_LEN,
};
use crate::types::jobs::chaos_job::ChaosJob;
use crate::types::jobs::types::ChaosJobType;
use crate::worker::spec::template::apply_defaults;
use crate::worker::spec::{build_litmus_job, build_stress_job, run_selector, step_selector, stress_overlay, workload_name};

#[rstest]
fn workload_names_carry_a_lowercase_suffix() {
    let name = workload_name("kill-checkout");
    let suffix = name.strip_prefix("kill-checkout-").unwrap();
    assert_eq!(suffix.len(), JOB_NAME_SUFFIX_LEN);
    assert!(suffix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    assert_ne!(workload_name("kill-checkout"), name);
}

#[rstest]
fn selectors_scope_run_and_step() {
    let run_id = Uuid::new_v4();
    assert_eq!(run_selector(run_id), format!("chaos.job.id={}", run_id));
    assert_eq!(step_selector(run_id, "kill"), format!("chaos.job.id={},chaos.job.name=kill", run_id));
}

#[rstest]
fn litmus_job_runs_the_experiment_once() {
    let run_id = Uuid::new_v4();
    let mut step = ChaosJob::new("kill-checkout", ChaosJobType::PodDelete).with_config("APP_LABEL", "app=checkout");
    apply_defaults(&mut step, &HashMap::new()).unwrap();

    let job = build_litmus_job(&step, run_id, "test-chaos");

    assert!(job.metadata.name.as_deref().unwrap().starts_with("kill-checkout-"));
    assert_eq!(job.metadata.namespace.as_deref(), Some("test-chaos"));
    assert_eq!(job_label(&job, CHAOS_JOB_LABEL).as_deref(), Some("true"));
    assert_eq!(job_label(&job, CHAOS_RUN_ID_LABEL), Some(run_id.to_string()));
    assert_eq!(job_label(&job, CHAOS_STEP_NAME_LABEL).as_deref(), Some("kill-checkout"));

    let spec = job.spec.as_ref().unwrap();
    assert_eq!(spec.backoff_limit, Some(0));
    assert_eq!(spec.template.metadata.as_ref().unwrap().labels, job.metadata.labels);

    let pod_spec = spec.template.spec.as_ref().unwrap();
    assert_eq!(pod_spec.restart_policy.as_deref(), Some("Never"));
    assert_eq!(pod_spec.service_account_name.as_deref(), Some(step.service_account_name.as_str()));
    let container = &pod_spec.containers[0];
    assert_eq!(container.image.as_deref(), Some(step.image.as_str()));
    assert_eq!(container.image_pull_policy.as_deref(), Some("Always"));
    assert_eq!(container.args.as_ref().unwrap()[1], "./experiments Name pod-delete");
    assert_eq!(container.security_context.as_ref().unwrap().privileged, Some(false));

    let env = container_env(&job);
    assert_eq!(env.get("APP_LABEL").map(String::as_str), Some("app=checkout"));
    assert_eq!(env.get("TOTAL_CHAOS_DURATION").map(String::as_str), Some("15"));
}

#[rstest]
fn overlay_targets_one_pod() {
    let step = stress_step(&[]);
    let env = stress_overlay(&step.config, &ready_pod("checkout-1"), None);

    assert_eq!(env.get("APP_POD").map(String::as_str), Some("checkout-1"));
    assert_eq!(env.get("CPU_CORES").map(String::as_str), Some("0"));
    assert_eq!(env.get("FILESYSTEM_UTILIZATION_PERCENTAGE").map(String::as_str), Some("0"));
    assert_eq!(env.get("STRESS_TYPE").map(String::as_str), Some("pod-io-stress"));
    assert_eq!(env.get("APP_CONTAINER").map(String::as_str), Some("checkout"));
    assert_eq!(env.get("TOTAL_CHAOS_DURATION"), step.config.get("TOTAL_CHAOS_DURATION"));
    assert!(!step.config.contains_key("APP_POD"));
}

#[rstest]
fn overlay_keeps_configured_container_and_uses_remaining_time() {
    let step = stress_step(&[("APP_CONTAINER", "sidecar")]);
    let env = stress_overlay(&step.config, &ready_pod("checkout-2"), Some(17));

    assert_eq!(env.get("APP_CONTAINER").map(String::as_str), Some("sidecar"));
    assert_eq!(env.get("TOTAL_CHAOS_DURATION").map(String::as_str), Some("17"));
}

#[rstest]
fn stress_job_is_pinned_to_the_target_node() {
    let run_id = Uuid::new_v4();
    let step = stress_step(&[]);
    let pod = ready_pod("checkout-1");
    let env = stress_overlay(&step.config, &pod, None);

    let job = build_stress_job(&step, &env, run_id, "test-chaos", &pod.name, pod.node_name.as_deref()).unwrap();

    assert_eq!(job_label(&job, CHAOS_TARGET_POD_LABEL).as_deref(), Some("checkout-1"));
    assert_eq!(job_label(&job, CHAOS_RUN_ID_LABEL), Some(run_id.to_string()));
    let pod_spec = job.spec.as_ref().unwrap().template.spec.as_ref().unwrap();
    assert_eq!(pod_spec.host_pid, Some(true));
    assert_eq!(pod_spec.node_name.as_deref(), Some("node-a"));
    assert_eq!(pod_spec.termination_grace_period_seconds, Some(0));

    let volumes = pod_spec.volumes.as_ref().unwrap();
    let host_paths: Vec<&str> = volumes.iter().map(|v| v.host_path.as_ref().unwrap().path.as_str()).collect();
    assert_eq!(host_paths, vec!["/run/containerd/containerd.sock", "/sys"]);

    let container = &pod_spec.containers[0];
    assert_eq!(container.args.as_ref().unwrap()[1], "./helpers -name stress-chaos");
    let security = container.security_context.as_ref().unwrap();
    assert_eq!(security.privileged, Some(true));
    assert_eq!(security.run_as_user, Some(0));
    assert_eq!(security.capabilities.as_ref().unwrap().add, Some(vec!["SYS_ADMIN".to_string()]));
    assert_eq!(container_env(&job).get("APP_POD").map(String::as_str), Some("checkout-1"));
}

#[rstest]
fn invalid_grace_period_is_rejected() {
    let step = stress_step(&[]);
    let mut env: BTreeMap<String, String> = stress_overlay(&step.config, &ready_pod("checkout-1"), None);
    env.insert("TERMINATION_GRACE_PERIOD_SECONDS".to_string(), "soon".to_string());

    let result = build_stress_job(&step, &env, Uuid::new_v4(), "test-chaos", "checkout-1", None);
    assert_matches!(result, Err(JobError::InvalidConfigValue { key, .. }) if key == "TERMINATION_GRACE_PERIOD_SECONDS");
}
