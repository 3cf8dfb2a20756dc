pub mod chaos_job;
pub mod status_update;
pub mod types;
