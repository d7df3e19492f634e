use crate::event::TelemetryEvent;
use async_trait::async_trait;
use std::error::Error;

/// Handle to the external monitoring backend's delivery API.
///
/// The forwarder calls `notify` exactly once per non-suppressed record.
/// Implementations own everything past the handoff: network transport,
/// batching, offline queueing, retries.
#[async_trait]
pub trait NotifyClient: Send + Sync {
    /// Deliver one telemetry event to the backend.
    ///
    /// **Parameters**
    /// - `message`: resolved message text of the record.
    /// - `event`: assembled [`TelemetryEvent`] with severity and metadata.
    ///
    /// **Returns**
    /// - `Ok(())` if the backend accepted the event.
    /// - `Err(..)` on delivery failure (network error, HTTP status, etc.).
    ///   The forwarder deliberately ignores this outcome; callers needing
    ///   delivery guarantees must instrument the client directly.
    async fn notify(
        &self,
        message: &str,
        event: &TelemetryEvent,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}
