use crate::record::{LogRecord, Message, Metadata};
use crate::sink::LogSink;
use chrono::Utc;
use serde_json::Value;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that observes events and forwards them to a
/// [`LogSink`] via a bounded channel and background task.
///
/// Events at `capture_level` or above are converted into [`LogRecord`]s;
/// everything past the channel handoff runs on a Tokio task, so delivery
/// never blocks application threads. The worker forwards one record at a
/// time and a full channel drops the record, keeping the layer itself free
/// of queues beyond the handoff buffer.
pub struct MonitorLayer {
    sender: mpsc::Sender<LogRecord>,
    capture_level: Level,
    /// Total events seen by the layer (before filtering by level).
    pub total_events: Arc<AtomicU64>,
    /// Successfully handed to the forwarding task.
    pub enqueued_events: Arc<AtomicU64>,
    /// Dropped because the channel was full.
    pub dropped_events: Arc<AtomicU64>,
}

impl MonitorLayer {
    /// Create a new layer and spawn a background task that pulls
    /// [`LogRecord`]s from a bounded channel and submits them to the
    /// provided [`LogSink`].
    ///
    /// A minimal `buffer` threshold is enforced to avoid degenerate
    /// configurations. The task exits when the layer is dropped and the
    /// channel drains.
    pub fn new(
        sink: Arc<dyn LogSink>,
        buffer: usize,
        capture_level: Level,
    ) -> (Self, JoinHandle<()>) {
        let buffer = buffer.max(16);
        let (tx, mut rx) = mpsc::channel::<LogRecord>(buffer);

        let total_events = Arc::new(AtomicU64::new(0));
        let enqueued_events = Arc::new(AtomicU64::new(0));
        let dropped_events = Arc::new(AtomicU64::new(0));

        let enqueued_events_bg = Arc::clone(&enqueued_events);

        let handle = tokio::spawn(async move {
            while let Some(record) = rx.recv().await {
                enqueued_events_bg.fetch_add(1, Ordering::Relaxed);

                let LogRecord {
                    timestamp,
                    level,
                    message,
                    mut metadata,
                } = record;
                metadata
                    .entry("timestamp")
                    .or_insert_with(|| Value::String(timestamp.to_rfc3339()));

                sink.log(&level, message, metadata).await;
            }
        });

        (
            Self {
                sender: tx,
                capture_level,
                total_events,
                enqueued_events,
                dropped_events,
            },
            handle,
        )
    }
}

/// Source-side level name for a tracing level.
///
/// `TRACE` has no direct counterpart among the source level names and maps
/// to `verbose`; the rest keep their lowercase names.
pub fn source_level(level: &Level) -> &'static str {
    if *level == Level::ERROR {
        "error"
    } else if *level == Level::WARN {
        "warn"
    } else if *level == Level::INFO {
        "info"
    } else if *level == Level::DEBUG {
        "debug"
    } else {
        "verbose"
    }
}

impl<S> Layer<S> for MonitorLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event, _ctx: Context<'_, S>) {
        self.total_events.fetch_add(1, Ordering::Relaxed);
        if *event.metadata().level() > self.capture_level {
            return;
        }

        let mut fields = Metadata::new();
        let mut message: Option<String> = None;

        let mut visitor = FieldVisitor {
            fields: &mut fields,
            message: &mut message,
        };
        event.record(&mut visitor);

        let meta = event.metadata();
        fields.insert(
            "target".to_string(),
            Value::String(meta.target().to_string()),
        );
        if let Some(module_path) = meta.module_path() {
            fields.insert(
                "module_path".to_string(),
                Value::String(module_path.to_string()),
            );
        }
        if let Some(file) = meta.file() {
            fields.insert("file".to_string(), Value::String(file.to_string()));
        }
        if let Some(line) = meta.line() {
            fields.insert("line".to_string(), Value::from(line));
        }

        let record = LogRecord {
            timestamp: Utc::now(),
            level: source_level(meta.level()).to_string(),
            message: Message::Text(message.unwrap_or_default()),
            metadata: fields,
        };

        if self.sender.try_send(record).is_err() {
            self.dropped_events.fetch_add(1, Ordering::Relaxed);
            eprintln!("log channel full, dropping log record");
        }
    }
}

use tracing::field::{Field, Visit};

pub struct FieldVisitor<'a> {
    pub fields: &'a mut Metadata,
    pub message: &'a mut Option<String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields
                .insert(field.name().to_string(), Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields.insert(
                field.name().to_string(),
                Value::String(format!("{:?}", value)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::RecordingClient;
    use crate::forwarder::{MonitorSink, SinkConfig};
    use serde_json::json;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    #[tokio::test]
    async fn error_events_reach_the_client() {
        let client = Arc::new(RecordingClient::default());
        let sink = Arc::new(MonitorSink::with_client(
            SinkConfig::default(),
            Arc::clone(&client) as Arc<dyn crate::client::NotifyClient>,
        ));

        let (layer, handle) = MonitorLayer::new(sink, 64, Level::ERROR);
        let total = Arc::clone(&layer.total_events);
        let enqueued = Arc::clone(&layer.enqueued_events);

        let subscriber = Registry::default().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(code = 7, "exploded");
            tracing::info!("below capture level");
        });

        // dropping the subscriber closes the channel and lets the worker drain
        handle.await.unwrap();

        assert_eq!(total.load(Ordering::Relaxed), 2);
        assert_eq!(enqueued.load(Ordering::Relaxed), 1);

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "exploded");
        assert_eq!(calls[0].1.severity, "error");
        assert_eq!(calls[0].1.meta_data["code"], json!(7));
        assert!(calls[0].1.meta_data.get("timestamp").is_some());
        assert!(calls[0].1.meta_data.get("target").is_some());
    }

    #[tokio::test]
    async fn capture_level_widens_to_warnings() {
        let client = Arc::new(RecordingClient::default());
        let sink = Arc::new(MonitorSink::with_client(
            SinkConfig::default(),
            Arc::clone(&client) as Arc<dyn crate::client::NotifyClient>,
        ));

        let (layer, handle) = MonitorLayer::new(sink, 64, Level::WARN);
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("disk low");
        });
        handle.await.unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "disk low");
        assert_eq!(calls[0].1.severity, "warning");
    }

    #[tokio::test]
    async fn full_channel_drops_records_and_bumps_the_counter() {
        let client = Arc::new(RecordingClient::default());
        let sink = Arc::new(MonitorSink::with_client(
            SinkConfig::default(),
            Arc::clone(&client) as Arc<dyn crate::client::NotifyClient>,
        ));

        // Request a 1-slot buffer; the layer widens it to its 16-slot
        // minimum. On the current-thread runtime the worker cannot run
        // while the closure below executes, so everything past the buffer
        // capacity must hit the drop path.
        let (layer, handle) = MonitorLayer::new(sink, 1, Level::ERROR);
        let total = Arc::clone(&layer.total_events);
        let enqueued = Arc::clone(&layer.enqueued_events);
        let dropped = Arc::clone(&layer.dropped_events);

        let subscriber = Registry::default().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            for i in 0..40u32 {
                tracing::error!(iteration = i, "flooding the channel");
            }
        });
        handle.await.unwrap();

        let total = total.load(Ordering::Relaxed);
        let enqueued = enqueued.load(Ordering::Relaxed);
        let dropped = dropped.load(Ordering::Relaxed);

        assert_eq!(total, 40);
        assert!(dropped > 0, "overflow must be dropped, not queued");
        assert_eq!(enqueued + dropped, total);
        assert_eq!(client.calls().len() as u64, enqueued);
    }

    #[test]
    fn trace_maps_to_verbose() {
        assert_eq!(source_level(&Level::TRACE), "verbose");
        assert_eq!(source_level(&Level::WARN), "warn");
        assert_eq!(source_level(&Level::ERROR), "error");
    }
}
