pub mod error;
pub mod kubernetes;

use async_trait::async_trait;
pub use error::PlatformError;
use futures::stream::BoxStream;
use k8s_openapi::api::batch::v1::Job;

/// Lifecycle phase of a pod as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    #[default]
    Unknown,
}

impl From<&str> for PodPhase {
    fn from(value: &str) -> Self {
        match value {
            "Pending" => PodPhase::Pending,
            "Running" => PodPhase::Running,
            "Succeeded" => PodPhase::Succeeded,
            "Failed" => PodPhase::Failed,
            _ => PodPhase::Unknown,
        }
    }
}

/// The parts of a pod the chaos engine looks at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PodInfo {
    pub name: String,
    pub namespace: String,
    pub phase: PodPhase,
    /// `ContainersReady` condition is true
    pub containers_ready: bool,
    /// A deletion timestamp is set
    pub deleting: bool,
    pub node_name: Option<String>,
    pub container_names: Vec<String>,
    /// Object version, a watch reopened from it resumes after this pod state
    pub resource_version: String,
}

impl PodInfo {
    /// Running, containers ready and not being deleted.
    pub fn is_eligible(&self) -> bool {
        self.phase == PodPhase::Running && self.containers_ready && !self.deleting
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PodEvent {
    Added(PodInfo),
    Modified(PodInfo),
    Deleted(PodInfo),
}

impl PodEvent {
    pub fn pod(&self) -> &PodInfo {
        match self {
            PodEvent::Added(pod) | PodEvent::Modified(pod) | PodEvent::Deleted(pod) => pod,
        }
    }
}

pub type PodEventStream = BoxStream<'static, Result<PodEvent, PlatformError>>;

/// Trait defining the container platform operations the chaos engine needs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// create_job - Submit a batch workload
    async fn create_job(&self, namespace: &str, job: Job) -> Result<Job, PlatformError>;
    /// list_jobs - List batch workloads matching a label selector
    async fn list_jobs(&self, namespace: &str, label_selector: &str) -> Result<Vec<Job>, PlatformError>;
    /// delete_job - Delete a batch workload and, in the foreground, the pods it owns
    async fn delete_job(&self, namespace: &str, name: &str) -> Result<(), PlatformError>;
    /// get_pod - Get a pod by exact name
    async fn get_pod(&self, namespace: &str, name: &str) -> Result<PodInfo, PlatformError>;
    /// list_running_pods - List pods in the running phase matching a label selector, in listing order
    async fn list_running_pods(&self, namespace: &str, label_selector: &str) -> Result<Vec<PodInfo>, PlatformError>;
    /// watch_pods - Watch add, modify and delete events of pods matching a label selector,
    /// starting after `resource_version`. The platform ends the stream on its own watch timeout.
    async fn watch_pods(
        &self,
        namespace: &str,
        label_selector: &str,
        resource_version: &str,
    ) -> Result<PodEventStream, PlatformError>;
}
