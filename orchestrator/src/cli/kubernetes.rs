use clap::Args;

/// Parameters used to reach the cluster that runs chaos workloads.
#[derive(Debug, Clone, Args)]
#[group()]
pub struct KubernetesCliArgs {
    /// Namespace the chaos jobs are created in.
    #[arg(env = "JOB_NAMESPACE", long, default_value = "test-chaos")]
    pub job_namespace: String,

    /// Use the local kubeconfig instead of the in-cluster service account.
    #[arg(env = "LOCAL_DEBUG", long, default_value_t = false)]
    pub local_debug: bool,
}
