//! Keeps a fraction of the application pods under stress while the pod population churns.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::client::platform::{PlatformClient, PodEvent, PodInfo};
use crate::error::job::JobResult;
use crate::types::jobs::chaos_job::ChaosJob;
use crate::worker::spec::{build_stress_job, stress_overlay};
use crate::worker::target::expected_targets;
use crate::worker::watch::PodWatch;

/// Pods of one stress step: `active` carry a stress workload, `observed` are every distinct
/// eligible pod seen so far. Owned by a single reconcile loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodTargetSet {
    active: HashSet<String>,
    observed: HashSet<String>,
}

/// What the loop does in response to one pod event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileAction {
    /// An active pod came back ready, stress it again for the remaining time
    Relaunch(PodInfo),
    /// A new eligible pod raised the expected target count
    ScaleUp(PodInfo),
    /// The pod is gone and no longer counted
    Removed(String),
    Ignored,
}

impl PodTargetSet {
    /// `observed` is seeded with every candidate the initial selection considered, not only
    /// the launched ones, and always includes `active`.
    pub fn new<A, O>(active: A, observed: O) -> Self
    where
        A: IntoIterator<Item = String>,
        O: IntoIterator<Item = String>,
    {
        let active: HashSet<String> = active.into_iter().collect();
        let mut observed: HashSet<String> = observed.into_iter().collect();
        observed.extend(active.iter().cloned());
        Self { active, observed }
    }

    pub fn active(&self) -> &HashSet<String> {
        &self.active
    }

    pub fn observed(&self) -> &HashSet<String> {
        &self.observed
    }

    /// Updates the sets for `event` and returns the workload to launch, if any.
    ///
    /// `remaining_secs == 0` means no time is left and nothing is launched.
    pub fn decide(&mut self, event: &PodEvent, percentage: u32, remaining_secs: u64) -> ReconcileAction {
        match event {
            PodEvent::Added(_) => ReconcileAction::Ignored,
            PodEvent::Deleted(pod) => {
                let was_active = self.active.remove(&pod.name);
                let was_observed = self.observed.remove(&pod.name);
                if was_active || was_observed {
                    ReconcileAction::Removed(pod.name.clone())
                } else {
                    ReconcileAction::Ignored
                }
            }
            PodEvent::Modified(pod) if pod.is_eligible() => {
                if self.active.contains(&pod.name) && remaining_secs > 0 {
                    ReconcileAction::Relaunch(pod.clone())
                } else if !self.observed.contains(&pod.name) {
                    self.observed.insert(pod.name.clone());
                    let expected = expected_targets(self.observed.len(), percentage);
                    if expected > self.active.len() && remaining_secs > 0 {
                        self.active.insert(pod.name.clone());
                        ReconcileAction::ScaleUp(pod.clone())
                    } else {
                        ReconcileAction::Ignored
                    }
                } else {
                    ReconcileAction::Ignored
                }
            }
            PodEvent::Modified(_) => ReconcileAction::Ignored,
        }
    }
}

/// Creates the per-pod stress workloads of one step.
pub struct StressLauncher {
    platform: Arc<dyn PlatformClient>,
    step: ChaosJob,
    run_id: Uuid,
    namespace: String,
}

impl StressLauncher {
    pub fn new(platform: Arc<dyn PlatformClient>, step: ChaosJob, run_id: Uuid, namespace: impl Into<String>) -> Self {
        Self { platform, step, run_id, namespace: namespace.into() }
    }

    /// Launches a stress workload against `pod`. `remaining_secs` overrides the configured duration.
    pub async fn launch(&self, pod: &PodInfo, remaining_secs: Option<u64>) -> JobResult<()> {
        let env = stress_overlay(&self.step.config, pod, remaining_secs);
        let job = build_stress_job(&self.step, &env, self.run_id, &self.namespace, &pod.name, pod.node_name.as_deref())?;
        self.platform.create_job(&self.namespace, job).await?;
        info!(
            run_id = %self.run_id,
            job_name = %self.step.name,
            pod = %pod.name,
            node = ?pod.node_name,
            remaining_secs = ?remaining_secs,
            "Stress workload launched"
        );
        Ok(())
    }
}

/// Reacts to application pod events until the deadline passes or a platform call fails.
pub struct ReconcileLoop {
    launcher: StressLauncher,
    targets: PodTargetSet,
    percentage: u32,
    deadline: Instant,
}

impl ReconcileLoop {
    pub fn new(launcher: StressLauncher, targets: PodTargetSet, percentage: u32, deadline: Instant) -> Self {
        Self { launcher, targets, percentage, deadline }
    }

    pub async fn run(mut self, mut watch: PodWatch) -> JobResult<PodTargetSet> {
        loop {
            let event = tokio::select! {
                event = watch.next() => event?,
                _ = sleep_until(self.deadline) => break,
            };
            let now = Instant::now();
            if now >= self.deadline {
                break;
            }
            let remaining_secs = self.deadline.saturating_duration_since(now).as_secs();

            match self.targets.decide(&event, self.percentage, remaining_secs) {
                ReconcileAction::Relaunch(pod) => {
                    info!(job_name = %self.launcher.step.name, pod = %pod.name, "Active pod ready again, relaunching stress");
                    self.launcher.launch(&pod, Some(remaining_secs)).await?;
                }
                ReconcileAction::ScaleUp(pod) => {
                    info!(
                        job_name = %self.launcher.step.name,
                        pod = %pod.name,
                        active = self.targets.active().len(),
                        observed = self.targets.observed().len(),
                        "New eligible pod, scaling up stress"
                    );
                    self.launcher.launch(&pod, Some(remaining_secs)).await?;
                }
                ReconcileAction::Removed(pod) => {
                    info!(job_name = %self.launcher.step.name, pod = %pod, "Pod deleted, removed from targets");
                }
                ReconcileAction::Ignored => {}
            }
        }
        debug!(job_name = %self.launcher.step.name, "Deadline reached, stopping pod watch");
        Ok(self.targets)
    }
}
