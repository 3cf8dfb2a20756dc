use crate::cli::server::ServerCliArgs;
use crate::cli::service::ServiceCliArgs;

#[derive(Debug, Clone)]
pub struct ServiceParams {
    /// Capacity of the status queue shared by every step runner
    pub status_queue_capacity: usize,
    /// Retries of a single status write after a version conflict
    pub max_status_write_retries: u32,
}

impl Default for ServiceParams {
    fn default() -> Self {
        Self { status_queue_capacity: 100, max_status_write_retries: 5 }
    }
}

impl From<ServiceCliArgs> for ServiceParams {
    fn from(args: ServiceCliArgs) -> Self {
        Self { status_queue_capacity: args.status_queue_capacity, max_status_write_retries: args.max_status_write_retries }
    }
}

#[derive(Debug, Clone)]
pub struct ServerParams {
    pub host: String,
    pub port: u16,
}

impl From<ServerCliArgs> for ServerParams {
    fn from(value: ServerCliArgs) -> Self {
        Self { host: value.host, port: value.port }
    }
}
