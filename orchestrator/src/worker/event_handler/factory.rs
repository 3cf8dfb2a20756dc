use std::sync::Arc;

use crate::error::job::{JobError, JobResult};
use crate::types::jobs::types::ChaosJobType;
use crate::worker::event_handler::jobs::{
    pod_delete::PodDeleteJobHandler, pod_io_stress::PodIoStressJobHandler, JobHandlerTrait,
};

/// Returns the handler that runs steps of `job_type`.
pub fn get_job_handler(job_type: &ChaosJobType) -> JobResult<Arc<dyn JobHandlerTrait>> {
    match job_type {
        ChaosJobType::PodDelete => Ok(Arc::new(PodDeleteJobHandler)),
        ChaosJobType::PodIoStress => Ok(Arc::new(PodIoStressJobHandler)),
        ChaosJobType::Unsupported(name) => Err(JobError::UnsupportedType(name.clone())),
    }
}
