use crate::core::client::platform::{PlatformClient, PlatformError, PodEvent, PodEventStream, PodInfo, PodPhase};
use crate::types::params::kubernetes::KubernetesArgs;
use async_trait::async_trait;
use futures::StreamExt;
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, DeleteParams, ListParams, PostParams, WatchEvent, WatchParams};
use kube::config::KubeConfigOptions;
use kube::{Client, Config};
use tracing::{debug, info};

const HTTP_GONE: u16 = 410;

/// Kubernetes implementation of [`PlatformClient`].
///
/// One client is built at startup and shared by every step through `Config`.
pub struct KubernetesClient {
    client: Client,
}

impl KubernetesClient {
    /// Builds a client from the local kubeconfig when `local_debug` is set, from the
    /// in-cluster service account otherwise.
    pub async fn new(args: &KubernetesArgs) -> Result<Self, PlatformError> {
        let config = if args.local_debug {
            Config::from_kubeconfig(&KubeConfigOptions::default())
                .await
                .map_err(|e| PlatformError::ConfigError(e.to_string()))?
        } else {
            Config::incluster().map_err(|e| PlatformError::ConfigError(e.to_string()))?
        };
        info!(cluster_url = %config.cluster_url, local_debug = args.local_debug, "Kubernetes client configured");
        Ok(Self { client: Client::try_from(config)? })
    }

    fn jobs(&self, namespace: &str) -> Api<Job> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

impl TryFrom<Pod> for PodInfo {
    type Error = PlatformError;

    fn try_from(pod: Pod) -> Result<Self, Self::Error> {
        let name = pod.metadata.name.ok_or_else(|| PlatformError::MissingField("metadata.name".to_string()))?;
        let namespace = pod.metadata.namespace.unwrap_or_default();
        let deleting = pod.metadata.deletion_timestamp.is_some();
        let resource_version = pod.metadata.resource_version.unwrap_or_default();

        let (phase, containers_ready) = match pod.status {
            Some(status) => {
                let phase = status.phase.as_deref().map(PodPhase::from).unwrap_or_default();
                let ready = status
                    .conditions
                    .unwrap_or_default()
                    .iter()
                    .any(|condition| condition.type_ == "ContainersReady" && condition.status == "True");
                (phase, ready)
            }
            None => (PodPhase::Unknown, false),
        };

        let (node_name, container_names) = match pod.spec {
            Some(spec) => (spec.node_name, spec.containers.into_iter().map(|container| container.name).collect()),
            None => (None, Vec::new()),
        };

        Ok(Self { name, namespace, phase, containers_ready, deleting, node_name, container_names, resource_version })
    }
}

#[async_trait]
impl PlatformClient for KubernetesClient {
    async fn create_job(&self, namespace: &str, job: Job) -> Result<Job, PlatformError> {
        let created = self.jobs(namespace).create(&PostParams::default(), &job).await?;
        debug!(namespace = %namespace, job = ?created.metadata.name, "Job created");
        Ok(created)
    }

    async fn list_jobs(&self, namespace: &str, label_selector: &str) -> Result<Vec<Job>, PlatformError> {
        let jobs = self.jobs(namespace).list(&ListParams::default().labels(label_selector)).await?;
        Ok(jobs.items)
    }

    async fn delete_job(&self, namespace: &str, name: &str) -> Result<(), PlatformError> {
        self.jobs(namespace).delete(name, &DeleteParams::foreground()).await?;
        debug!(namespace = %namespace, job = %name, "Job deleted");
        Ok(())
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> Result<PodInfo, PlatformError> {
        match self.pods(namespace).get(name).await {
            Ok(pod) => PodInfo::try_from(pod),
            Err(kube::Error::Api(response)) if response.code == 404 => Err(PlatformError::NotFound {
                kind: "pod".to_string(),
                name: name.to_string(),
                namespace: namespace.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_running_pods(&self, namespace: &str, label_selector: &str) -> Result<Vec<PodInfo>, PlatformError> {
        let params = ListParams::default().labels(label_selector).fields("status.phase=Running");
        let pods = self.pods(namespace).list(&params).await?;
        pods.items.into_iter().map(PodInfo::try_from).collect()
    }

    async fn watch_pods(
        &self,
        namespace: &str,
        label_selector: &str,
        resource_version: &str,
    ) -> Result<PodEventStream, PlatformError> {
        let params = WatchParams::default().labels(label_selector);
        let stream = self.pods(namespace).watch(&params, resource_version).await?;
        debug!(namespace = %namespace, selector = %label_selector, resource_version = %resource_version, "Pod watch opened");
        let events = stream.filter_map(|event| async move {
            match event {
                Ok(WatchEvent::Added(pod)) => Some(PodInfo::try_from(pod).map(PodEvent::Added)),
                Ok(WatchEvent::Modified(pod)) => Some(PodInfo::try_from(pod).map(PodEvent::Modified)),
                Ok(WatchEvent::Deleted(pod)) => Some(PodInfo::try_from(pod).map(PodEvent::Deleted)),
                Ok(WatchEvent::Bookmark(_)) => None,
                Ok(WatchEvent::Error(response)) if response.code == HTTP_GONE => {
                    Some(Err(PlatformError::WatchExpired(response.message)))
                }
                Ok(WatchEvent::Error(response)) => Some(Err(PlatformError::WatchError(response.message))),
                Err(e) => Some(Err(PlatformError::KubeError(e))),
            }
        });
        Ok(events.boxed())
    }
}
