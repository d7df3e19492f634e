use crate::client::NotifyClient;
use crate::event::TelemetryEvent;
use async_trait::async_trait;
use std::error::Error;

/// A client that simply drops all notifications.
///
/// Useful for measuring the overhead of the layer and forwarder without any
/// external I/O, and for wiring tests that don't care about delivery.
#[derive(Clone, Default)]
pub struct NoopClient;

#[async_trait]
impl NotifyClient for NoopClient {
    async fn notify(
        &self,
        _message: &str,
        _event: &TelemetryEvent,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
