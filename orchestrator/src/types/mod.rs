pub mod constant;
pub mod jobs;
pub mod params;
pub mod run_status;
pub mod scenario;
