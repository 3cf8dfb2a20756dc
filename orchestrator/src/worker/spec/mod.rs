//! Pure builders turning a step into platform workloads.
//!
//! Nothing here performs I/O or mutates the step. Per-pod values are passed in as an
//! overlay computed by [`stress_overlay`].

pub mod template;

use std::collections::BTreeMap;

use k8s_openapi::api::batch::v1::{Job, JobSpec};
use k8s_openapi::api::core::v1::{
    Capabilities, Container, EnvVar, HostPathVolumeSource, PodSpec, PodTemplateSpec, SecurityContext, Volume,
    VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use rand::Rng;
use uuid::Uuid;

use crate::core::client::platform::PodInfo;
use crate::error::job::{JobError, JobResult};
use crate::types::constant::{
    CHAOS_JOB_LABEL, CHAOS_RUN_ID_LABEL, CHAOS_STEP_NAME_LABEL, CHAOS_TARGET_POD_LABEL, ENV_APP_CONTAINER,
    ENV_APP_POD, ENV_CPU_CORES, ENV_FILESYSTEM_UTILIZATION_PERCENTAGE, ENV_SOCKET_PATH, ENV_STRESS_TYPE,
    ENV_TERMINATION_GRACE_PERIOD_SECONDS, ENV_TOTAL_CHAOS_DURATION, IO_STRESS_TYPE, JOB_NAME_SUFFIX_LEN,
};
use crate::types::jobs::chaos_job::ChaosJob;

const SOCKET_VOLUME: &str = "socket-path";
const SYS_VOLUME: &str = "sys-path";
const SYS_PATH: &str = "/sys";
const NAME_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Label selector matching every workload of a run. Cleanup uses it.
pub fn run_selector(run_id: Uuid) -> String {
    format!("{}={}", CHAOS_RUN_ID_LABEL, run_id)
}

/// Label selector matching the pods created for one step of a run.
pub fn step_selector(run_id: Uuid, step_name: &str) -> String {
    format!("{}={},{}={}", CHAOS_RUN_ID_LABEL, run_id, CHAOS_STEP_NAME_LABEL, step_name)
}

/// `<step>-<random suffix>`, lowercase so it is a valid object name.
pub fn workload_name(step_name: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..JOB_NAME_SUFFIX_LEN)
        .map(|_| NAME_CHARSET[rng.gen_range(0..NAME_CHARSET.len())] as char)
        .collect();
    format!("{}-{}", step_name, suffix)
}

fn workload_labels(step: &ChaosJob, run_id: Uuid, target_pod: Option<&str>) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::from([
        (CHAOS_JOB_LABEL.to_string(), "true".to_string()),
        (CHAOS_RUN_ID_LABEL.to_string(), run_id.to_string()),
        (CHAOS_STEP_NAME_LABEL.to_string(), step.name.clone()),
    ]);
    if let Some(pod) = target_pod {
        labels.insert(CHAOS_TARGET_POD_LABEL.to_string(), pod.to_string());
    }
    labels
}

fn env_vars(env: &BTreeMap<String, String>) -> Vec<EnvVar> {
    env.iter()
        .map(|(name, value)| EnvVar { name: name.clone(), value: Some(value.clone()), ..Default::default() })
        .collect()
}

fn wrap_in_job(
    name: String,
    namespace: &str,
    labels: BTreeMap<String, String>,
    pod_spec: PodSpec,
) -> Job {
    Job {
        metadata: ObjectMeta {
            name: Some(name),
            namespace: Some(namespace.to_string()),
            labels: Some(labels.clone()),
            ..Default::default()
        },
        spec: Some(JobSpec {
            backoff_limit: Some(0),
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta { labels: Some(labels), ..Default::default() }),
                spec: Some(pod_spec),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Builds the single workload of a litmus experiment step such as `pod-delete`.
///
/// The experiment binary picks the experiment by the step type and reads its tuning from
/// the environment, which is the step config flattened.
pub fn build_litmus_job(step: &ChaosJob, run_id: Uuid, namespace: &str) -> Job {
    let name = workload_name(&step.name);
    let container = Container {
        name: name.clone(),
        image: Some(step.image.clone()),
        command: Some(vec!["/bin/bash".to_string()]),
        args: Some(vec!["-c".to_string(), format!("./experiments Name {}", step.job_type)]),
        env: Some(env_vars(&step.config)),
        image_pull_policy: Some("Always".to_string()),
        security_context: Some(SecurityContext { privileged: Some(false), ..Default::default() }),
        ..Default::default()
    };
    let pod_spec = PodSpec {
        service_account_name: Some(step.service_account_name.clone()),
        restart_policy: Some("Never".to_string()),
        containers: vec![container],
        ..Default::default()
    };
    wrap_in_job(name, namespace, workload_labels(step, run_id, None), pod_spec)
}

/// Environment of the stress workload targeting `pod`: the step config plus the pod specific keys.
///
/// `remaining_secs` replaces the configured duration for workloads launched after the step started.
pub fn stress_overlay(
    config: &BTreeMap<String, String>,
    pod: &PodInfo,
    remaining_secs: Option<u64>,
) -> BTreeMap<String, String> {
    let mut env = config.clone();
    env.insert(ENV_APP_POD.to_string(), pod.name.clone());
    env.insert(ENV_CPU_CORES.to_string(), "0".to_string());
    env.insert(ENV_FILESYSTEM_UTILIZATION_PERCENTAGE.to_string(), "0".to_string());
    env.insert(ENV_STRESS_TYPE.to_string(), IO_STRESS_TYPE.to_string());
    let container_configured = config.get(ENV_APP_CONTAINER).is_some_and(|value| !value.is_empty());
    if !container_configured {
        if let Some(first) = pod.container_names.first() {
            env.insert(ENV_APP_CONTAINER.to_string(), first.clone());
        }
    }
    if let Some(remaining) = remaining_secs {
        env.insert(ENV_TOTAL_CHAOS_DURATION.to_string(), remaining.to_string());
    }
    env
}

/// Builds the stress helper workload for one target pod.
///
/// It runs privileged in the host pid namespace on the pod's node and mounts the container
/// runtime socket and the host `/sys`.
pub fn build_stress_job(
    step: &ChaosJob,
    env: &BTreeMap<String, String>,
    run_id: Uuid,
    namespace: &str,
    target_pod: &str,
    target_node: Option<&str>,
) -> JobResult<Job> {
    let grace_period = match env.get(ENV_TERMINATION_GRACE_PERIOD_SECONDS).filter(|value| !value.is_empty()) {
        Some(value) => Some(value.trim().parse::<i64>().map_err(|_| JobError::InvalidConfigValue {
            key: ENV_TERMINATION_GRACE_PERIOD_SECONDS.to_string(),
            value: value.clone(),
        })?),
        None => None,
    };
    let socket_path = env.get(ENV_SOCKET_PATH).cloned().unwrap_or_default();

    let name = workload_name(&step.name);
    let container = Container {
        name: name.clone(),
        image: Some(step.image.clone()),
        command: Some(vec!["/bin/bash".to_string()]),
        args: Some(vec!["-c".to_string(), "./helpers -name stress-chaos".to_string()]),
        env: Some(env_vars(env)),
        image_pull_policy: Some("Always".to_string()),
        volume_mounts: Some(vec![
            VolumeMount { name: SOCKET_VOLUME.to_string(), mount_path: socket_path.clone(), ..Default::default() },
            VolumeMount { name: SYS_VOLUME.to_string(), mount_path: SYS_PATH.to_string(), ..Default::default() },
        ]),
        security_context: Some(SecurityContext {
            privileged: Some(true),
            run_as_user: Some(0),
            capabilities: Some(Capabilities { add: Some(vec!["SYS_ADMIN".to_string()]), ..Default::default() }),
            ..Default::default()
        }),
        ..Default::default()
    };
    let pod_spec = PodSpec {
        host_pid: Some(true),
        termination_grace_period_seconds: grace_period,
        node_name: target_node.map(str::to_string),
        volumes: Some(vec![
            Volume {
                name: SOCKET_VOLUME.to_string(),
                host_path: Some(HostPathVolumeSource { path: socket_path, ..Default::default() }),
                ..Default::default()
            },
            Volume {
                name: SYS_VOLUME.to_string(),
                host_path: Some(HostPathVolumeSource { path: SYS_PATH.to_string(), ..Default::default() }),
                ..Default::default()
            },
        ]),
        service_account_name: Some(step.service_account_name.clone()),
        restart_policy: Some("Never".to_string()),
        containers: vec![container],
        ..Default::default()
    };
    Ok(wrap_in_job(name, namespace, workload_labels(step, run_id, Some(target_pod)), pod_spec))
}
