pub mod database;
pub mod kubernetes;
pub mod service;

pub use database::DatabaseArgs;
pub use kubernetes::KubernetesArgs;
pub use service::{ServerParams, ServiceParams};
