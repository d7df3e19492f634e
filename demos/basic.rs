use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

use monitor_log_sink::forwarder::{MonitorSink, SinkConfig};
use monitor_log_sink::init::{init_tracing_with_config, LayerConfig};

/// Wires the default HTTP client from `MONITOR_SINK_API_KEY` and
/// `MONITOR_SINK_ENDPOINT` and captures warnings and errors.
#[tokio::main]
async fn main() {
    let sink = MonitorSink::new(SinkConfig::default()).expect("build monitor sink");

    let layer_config = LayerConfig {
        channel_buffer: 1024,
        capture_level: tracing::Level::WARN,
        enable_stdout: true,
    };
    init_tracing_with_config(Arc::new(sink), layer_config);

    info!("below the capture level, stdout only");
    warn!(disk_free_mb = 120, "disk low");
    error!(code = 42, "simulated failure");

    // give the forwarding task a moment to drain before the process exits
    sleep(Duration::from_secs(2)).await;
}
