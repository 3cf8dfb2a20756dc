use crate::cli::kubernetes::KubernetesCliArgs;

/// Where chaos workloads are created and how the cluster is reached.
#[derive(Debug, Clone)]
pub struct KubernetesArgs {
    pub job_namespace: String,
    /// `true` reads the local kubeconfig, `false` uses the in-cluster environment
    pub local_debug: bool,
}

impl From<KubernetesCliArgs> for KubernetesArgs {
    fn from(args: KubernetesCliArgs) -> Self {
        Self { job_namespace: args.job_namespace, local_debug: args.local_debug }
    }
}
