pub mod factory;
pub mod jobs;
pub mod service;
