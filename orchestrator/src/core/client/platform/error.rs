use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to load cluster config: {0}")]
    ConfigError(String),

    #[error("{kind} {name} not found in namespace {namespace}")]
    NotFound { kind: String, name: String, namespace: String },

    /// The watch stream delivered an error event
    #[error("Watch error: {0}")]
    WatchError(String),

    /// The resource version a watch started from was compacted away
    #[error("Watch expired: {0}")]
    WatchExpired(String),

    #[error("Missing field {0} in platform object")]
    MissingField(String),
}
