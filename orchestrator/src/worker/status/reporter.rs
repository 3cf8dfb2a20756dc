use tokio::sync::{mpsc, Mutex};
use tracing::{error, warn};
use uuid::Uuid;

use crate::types::jobs::status_update::StatusUpdate;
use crate::types::jobs::types::JobStatus;

/// Emits the status transitions of one step to the status propagator.
///
/// A step reports `Running` at most once and exactly one terminal status. Anything else
/// is dropped here with a warning before it reaches the queue.
pub struct StatusReporter {
    sender: mpsc::Sender<StatusUpdate>,
    run_id: Uuid,
    job_name: String,
    current: Mutex<JobStatus>,
}

impl StatusReporter {
    pub fn new(sender: mpsc::Sender<StatusUpdate>, run_id: Uuid, job_name: impl Into<String>) -> Self {
        Self { sender, run_id, job_name: job_name.into(), current: Mutex::new(JobStatus::Pending) }
    }

    pub async fn current(&self) -> JobStatus {
        *self.current.lock().await
    }

    pub async fn running(&self) -> bool {
        self.report(JobStatus::Running, String::new()).await
    }

    /// Returns `true` if the update was queued.
    pub async fn report(&self, status: JobStatus, failed_reason: impl Into<String>) -> bool {
        let mut current = self.current.lock().await;
        if current.is_terminal() || !current.can_transition_to(status) {
            warn!(
                run_id = %self.run_id,
                job_name = %self.job_name,
                from = %*current,
                to = %status,
                "Dropping status transition not allowed for a step"
            );
            return false;
        }

        let update = StatusUpdate::new(self.run_id, self.job_name.clone(), status).with_reason(failed_reason);
        if let Err(e) = self.sender.send(update).await {
            error!(run_id = %self.run_id, job_name = %self.job_name, error = %e, "Status queue closed, update lost");
            return false;
        }
        *current = status;
        true
    }
}
