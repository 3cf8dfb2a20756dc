/// Label carried by every workload this service creates.
pub const CHAOS_JOB_LABEL: &str = "chaos.job";
/// Label holding the run id that owns a workload. Cleanup selects on it.
pub const CHAOS_RUN_ID_LABEL: &str = "chaos.job.id";
/// Label holding the step name that owns a workload.
pub const CHAOS_STEP_NAME_LABEL: &str = "chaos.job.name";
/// Label holding the target pod of a per-pod stress workload.
pub const CHAOS_TARGET_POD_LABEL: &str = "chaos.job.pod";

/// Length of the random suffix appended to workload names.
pub const JOB_NAME_SUFFIX_LEN: usize = 10;

// Experiment configuration keys understood by the litmus runners.
pub const ENV_APP_NAMESPACE: &str = "APP_NAMESPACE";
pub const ENV_APP_LABEL: &str = "APP_LABEL";
pub const ENV_APP_POD: &str = "APP_POD";
pub const ENV_APP_CONTAINER: &str = "APP_CONTAINER";
pub const ENV_TARGET_PODS: &str = "TARGET_PODS";
pub const ENV_PODS_AFFECTED_PERC: &str = "PODS_AFFECTED_PERC";
pub const ENV_TOTAL_CHAOS_DURATION: &str = "TOTAL_CHAOS_DURATION";
pub const ENV_CPU_CORES: &str = "CPU_CORES";
pub const ENV_FILESYSTEM_UTILIZATION_PERCENTAGE: &str = "FILESYSTEM_UTILIZATION_PERCENTAGE";
pub const ENV_STRESS_TYPE: &str = "STRESS_TYPE";
pub const ENV_SOCKET_PATH: &str = "SOCKET_PATH";
pub const ENV_TERMINATION_GRACE_PERIOD_SECONDS: &str = "TERMINATION_GRACE_PERIOD_SECONDS";

/// Value of `STRESS_TYPE` for io stress workloads.
pub const IO_STRESS_TYPE: &str = "pod-io-stress";

/// Failure reason recorded when the chaos pod of a pod-delete step ends in the failed phase.
pub const CHAOS_POD_FAILED_REASON: &str = "chaos job pod running failed";

/// Resource version that starts a pod watch from the current state.
pub const WATCH_FROM_CURRENT: &str = "0";
/// Pause before a pod watch closed by the platform is opened again.
pub const WATCH_REOPEN_DELAY_SECS: u64 = 1;
