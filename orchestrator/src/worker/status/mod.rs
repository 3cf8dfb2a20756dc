//! Single writer of run-status documents.
//!
//! Every step runner of every run sends its transitions into one bounded queue. One
//! propagator task applies them in arrival order. Each write is a compare-and-swap on the
//! document version, re-read and retried when another writer got there first.

pub mod reporter;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::core::client::database::{DatabaseClient, DatabaseError};
use crate::error::status::StatusError;
use crate::types::jobs::status_update::StatusUpdate;

/// Result of applying one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusApplied {
    /// The document now carries the new status
    Written,
    /// The transition is not allowed from the persisted status, nothing was written
    Rejected,
}

/// Creates the status queue. The sender half is cloned into every step runner.
pub fn status_channel(
    database: Arc<dyn DatabaseClient>,
    capacity: usize,
    max_retries: u32,
) -> (mpsc::Sender<StatusUpdate>, StatusPropagator) {
    let (sender, receiver) = mpsc::channel(capacity);
    (sender, StatusPropagator { database, receiver, max_retries })
}

pub struct StatusPropagator {
    database: Arc<dyn DatabaseClient>,
    receiver: mpsc::Receiver<StatusUpdate>,
    max_retries: u32,
}

impl StatusPropagator {
    /// Applies updates until every sender is dropped and the queue is drained.
    pub async fn run(mut self) {
        info!("Status propagator started");
        while let Some(update) = self.receiver.recv().await {
            match apply_status_update(self.database.as_ref(), &update, self.max_retries).await {
                Ok(StatusApplied::Written) => {
                    info!(run_id = %update.run_id, job_name = %update.job_name, status = %update.status, "Status updated");
                }
                Ok(StatusApplied::Rejected) => {}
                Err(e) => {
                    error!(run_id = %update.run_id, job_name = %update.job_name, error = %e, "Failed to update status");
                }
            }
        }
        info!("Status queue closed, status propagator stopped");
    }
}

/// Reads the run-status document, applies `update` if the transition is allowed and writes
/// it back, retrying on version conflicts up to `max_retries` times.
pub async fn apply_status_update(
    database: &dyn DatabaseClient,
    update: &StatusUpdate,
    max_retries: u32,
) -> Result<StatusApplied, StatusError> {
    let attempts = max_retries + 1;
    for attempt in 1..=attempts {
        let current = database.get_run_status(update.run_id).await?.ok_or(StatusError::RunNotFound(update.run_id))?;
        let mut tree = current.tree()?;
        let job = tree.find_job_mut(&update.job_name).ok_or_else(|| StatusError::StepNotFound {
            run_id: update.run_id,
            job_name: update.job_name.clone(),
        })?;

        if !job.status.can_transition_to(update.status) {
            warn!(
                run_id = %update.run_id,
                job_name = %update.job_name,
                from = %job.status,
                to = %update.status,
                "Status transition rejected"
            );
            return Ok(StatusApplied::Rejected);
        }
        job.status = update.status;
        job.failed_reason = update.failed_reason.clone();

        let status = tree.to_yaml().map_err(|e| StatusError::Codec(e.to_string()))?;
        match database.update_run_status(&current, status).await {
            Ok(_) => return Ok(StatusApplied::Written),
            Err(DatabaseError::VersionConflict { version, .. }) => {
                debug!(run_id = %update.run_id, version, attempt, "Run status changed concurrently, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(StatusError::RetriesExhausted { run_id: update.run_id, attempts })
}
