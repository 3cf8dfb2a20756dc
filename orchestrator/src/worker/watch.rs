//! Pod watches that outlive the platform's watch timeout.

use std::sync::Arc;

use futures::StreamExt;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use crate::core::client::platform::{PlatformClient, PlatformError, PodEvent, PodEventStream};
use crate::types::constant::{WATCH_FROM_CURRENT, WATCH_REOPEN_DELAY_SECS};

/// Label-scoped pod watch that reopens itself whenever the platform closes the stream.
///
/// The watch resumes from the last resource version it delivered. When that version has
/// expired it starts over from the current state, which replays every matching pod as
/// [`PodEvent::Added`]. Only an error event or a failed reopen ends it.
pub struct PodWatch {
    platform: Arc<dyn PlatformClient>,
    namespace: String,
    selector: String,
    resource_version: String,
    events: Option<PodEventStream>,
}

impl PodWatch {
    pub async fn open(
        platform: Arc<dyn PlatformClient>,
        namespace: impl Into<String>,
        selector: impl Into<String>,
    ) -> Result<Self, PlatformError> {
        let namespace = namespace.into();
        let selector = selector.into();
        let events = platform.watch_pods(&namespace, &selector, WATCH_FROM_CURRENT).await?;
        Ok(Self { platform, namespace, selector, resource_version: WATCH_FROM_CURRENT.to_string(), events: Some(events) })
    }

    /// Waits for the next pod event. Cancel safe.
    pub async fn next(&mut self) -> Result<PodEvent, PlatformError> {
        loop {
            let Some(events) = self.events.as_mut() else {
                self.reopen().await?;
                continue;
            };
            match events.next().await {
                Some(Ok(event)) => {
                    let version = &event.pod().resource_version;
                    if !version.is_empty() {
                        self.resource_version.clone_from(version);
                    }
                    return Ok(event);
                }
                Some(Err(PlatformError::WatchExpired(reason))) => {
                    warn!(
                        selector = %self.selector,
                        resource_version = %self.resource_version,
                        reason = %reason,
                        "Pod watch expired, restarting from the current state"
                    );
                    self.resource_version = WATCH_FROM_CURRENT.to_string();
                    self.events = None;
                }
                Some(Err(e)) => return Err(e),
                None => {
                    debug!(selector = %self.selector, resource_version = %self.resource_version, "Pod watch closed by the platform");
                    self.events = None;
                }
            }
        }
    }

    async fn reopen(&mut self) -> Result<(), PlatformError> {
        sleep(Duration::from_secs(WATCH_REOPEN_DELAY_SECS)).await;
        let events = self.platform.watch_pods(&self.namespace, &self.selector, &self.resource_version).await?;
        info!(
            namespace = %self.namespace,
            selector = %self.selector,
            resource_version = %self.resource_version,
            "Pod watch reopened"
        );
        self.events = Some(events);
        Ok(())
    }
}
