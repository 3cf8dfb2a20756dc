//! Choosing which application pods a stress step targets.

use tokio::time::{Duration, Instant};
use tracing::{info, warn};

use crate::core::client::platform::{PlatformClient, PodInfo, PodPhase};
use crate::error::job::{JobError, JobResult};
use crate::types::constant::{
    ENV_APP_LABEL, ENV_APP_NAMESPACE, ENV_PODS_AFFECTED_PERC, ENV_TARGET_PODS, ENV_TOTAL_CHAOS_DURATION,
};
use crate::types::jobs::chaos_job::ChaosJob;

const DEFAULT_APP_NAMESPACE: &str = "default";

/// Targeting settings of a stress step, read from its config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StressSettings {
    pub namespace: String,
    pub label: String,
    /// Explicit pod names. When non-empty the label only scopes the pod watch.
    pub target_pods: Vec<String>,
    /// `0` selects exactly one pod
    pub percentage: u32,
    pub duration_secs: u64,
}

impl StressSettings {
    pub fn from_job(job: &ChaosJob) -> JobResult<Self> {
        let percentage = match job.config_value(ENV_PODS_AFFECTED_PERC) {
            None => 0,
            Some(value) => parse_config(ENV_PODS_AFFECTED_PERC, value)?,
        };
        let duration_secs = parse_config(ENV_TOTAL_CHAOS_DURATION, job.config_value(ENV_TOTAL_CHAOS_DURATION).unwrap_or(""))?;
        let target_pods = job
            .config_value(ENV_TARGET_PODS)
            .map(|pods| pods.split(',').map(str::trim).filter(|pod| !pod.is_empty()).map(str::to_string).collect())
            .unwrap_or_default();

        Ok(Self {
            namespace: job.config_value(ENV_APP_NAMESPACE).unwrap_or(DEFAULT_APP_NAMESPACE).to_string(),
            label: job.config_value(ENV_APP_LABEL).unwrap_or_default().to_string(),
            target_pods,
            percentage,
            duration_secs,
        })
    }

    /// End of the stress window started at `start`. A duration past the clock's range is rejected.
    pub fn deadline(&self, start: Instant) -> JobResult<Instant> {
        start.checked_add(Duration::from_secs(self.duration_secs)).ok_or_else(|| JobError::InvalidConfigValue {
            key: ENV_TOTAL_CHAOS_DURATION.to_string(),
            value: self.duration_secs.to_string(),
        })
    }
}

fn parse_config<T: std::str::FromStr>(key: &str, value: &str) -> JobResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| JobError::InvalidConfigValue { key: key.to_string(), value: value.to_string() })
}

/// Number of pods that should be under chaos out of `observed` eligible pods.
pub fn expected_targets(observed: usize, percentage: u32) -> usize {
    if percentage == 0 {
        1
    } else {
        observed * percentage as usize / 100
    }
}

/// Outcome of the initial target selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSelection {
    /// Pods to launch a stress workload for
    pub selected: Vec<PodInfo>,
    /// Every pod the selection considered, seeds the observed set
    pub candidates: Vec<PodInfo>,
}

/// Resolves the initial targets of a stress step.
///
/// Explicit names are looked up one by one and any failed lookup fails the whole selection.
/// Otherwise running pods matching the label, with ready containers and no deletion pending,
/// are eligible. The first `expected_targets` pods in listing order are selected.
pub async fn select_targets(platform: &dyn PlatformClient, settings: &StressSettings) -> JobResult<TargetSelection> {
    let candidates = if settings.target_pods.is_empty() {
        let eligible: Vec<PodInfo> = platform
            .list_running_pods(&settings.namespace, &settings.label)
            .await?
            .into_iter()
            .filter(PodInfo::is_eligible)
            .collect();
        info!(namespace = %settings.namespace, label = %settings.label, eligible = eligible.len(), "Listed eligible pods");
        eligible
    } else {
        let mut pods = Vec::with_capacity(settings.target_pods.len());
        for name in &settings.target_pods {
            let pod = platform.get_pod(&settings.namespace, name).await.map_err(|e| JobError::TargetPodNotFound {
                name: name.clone(),
                namespace: settings.namespace.clone(),
                reason: e.to_string(),
            })?;
            pods.push(pod);
        }
        pods
    };

    if candidates.is_empty() {
        return Err(JobError::NoEligiblePods { namespace: settings.namespace.clone(), label: settings.label.clone() });
    }

    let count = expected_targets(candidates.len(), settings.percentage).min(candidates.len());
    let selected = candidates
        .iter()
        .take(count)
        .filter(|pod| {
            let running = pod.phase == PodPhase::Running;
            if !running {
                warn!(pod = %pod.name, phase = %pod.phase, "Skipping target pod that is not running");
            }
            running
        })
        .cloned()
        .collect::<Vec<_>>();
    info!(
        targets = ?selected.iter().map(|pod| pod.name.as_str()).collect::<Vec<_>>(),
        "Selected target pods"
    );

    Ok(TargetSelection { selected, candidates })
}
