// Core module - contains all the core abstractions

pub mod client;
pub mod config;
pub mod error;

// Re-export commonly used types from client
pub use client::database::DatabaseClient;
pub use client::platform::PlatformClient;
