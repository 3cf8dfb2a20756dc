// Client abstractions module - contains all client interface traits

pub mod database;
pub mod platform;

// Re-export commonly used types
pub use database::{mongodb::MongoDbClient, DatabaseClient};
pub use platform::{kubernetes::KubernetesClient, PlatformClient};
