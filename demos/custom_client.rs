use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::{sleep, Duration};
use tracing::error;

use monitor_log_sink::client::NotifyClient;
use monitor_log_sink::event::TelemetryEvent;
use monitor_log_sink::forwarder::{MonitorSink, SinkConfig};
use monitor_log_sink::init::init_tracing;

/// Example of plugging in a completely custom delivery client by
/// implementing the `NotifyClient` trait directly. Imagine this talks to a
/// proprietary monitoring backend for which this crate has no built-in
/// client.
struct MyBackendClient;

#[async_trait]
impl NotifyClient for MyBackendClient {
    async fn notify(
        &self,
        message: &str,
        event: &TelemetryEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        // Here you would call your own client library for the backend.
        // For the sake of example we just print the pair.
        println!("[my-backend] {} ({}): {:?}", message, event.severity, event.meta_data);
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let sink = MonitorSink::with_client(SinkConfig::default(), Arc::new(MyBackendClient));

    init_tracing(Arc::new(sink));

    error!(region = "eu-1", "simulated error sent via custom client");

    sleep(Duration::from_millis(200)).await;
}
