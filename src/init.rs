use crate::layer::MonitorLayer;
use crate::sink::LogSink;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration of the logging layer.
///
/// **Fields**
/// - `channel_buffer`: maximum number of records queued for the forwarding
///   task before new ones are dropped.
/// - `capture_level`: most verbose tracing level the layer converts into
///   log records; everything more verbose is ignored.
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt` layer is
///   stacked on top of [`MonitorLayer`] so events also print to the console.
#[derive(Clone, Debug)]
pub struct LayerConfig {
    pub channel_buffer: usize,
    pub capture_level: Level,
    pub enable_stdout: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 1024,
            capture_level: Level::ERROR,
            enable_stdout: true,
        }
    }
}

/// Initialize the global `tracing` subscriber using the provided sink and
/// [`LayerConfig`].
///
/// **Parameters**
/// - `sink`: implementation of [`LogSink`] that will receive the captured
///   records. The host constructs it and passes it in here; registration is
///   always this explicit call, never an ambient side effect.
/// - `config`: [`LayerConfig`] controlling buffering and capture behavior.
///
/// **Effects**
///
/// Installs a [`Registry`] combined with [`MonitorLayer`] as the global
/// default subscriber, so all `tracing` events in the process are observed
/// by the layer.
pub fn init_tracing_with_config(sink: Arc<dyn LogSink>, config: LayerConfig) {
    let (layer, _handle) = MonitorLayer::new(sink, config.channel_buffer, config.capture_level);

    // The sink layer is always installed. With `enable_stdout` the fmt layer
    // is stacked as well; the subscriber is assembled in two variants to
    // keep the types compatible.
    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");
    }
}

/// Initialize tracing with sensible defaults.
///
/// Equivalent to calling [`init_tracing_with_config`] with
/// [`LayerConfig::default`]. This is the recommended entrypoint for typical
/// services.
pub fn init_tracing(sink: Arc<dyn LogSink>) {
    init_tracing_with_config(sink, LayerConfig::default());
}
