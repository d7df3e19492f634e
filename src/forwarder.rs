use crate::client::NotifyClient;
use crate::event::translate;
use crate::record::{Message, Metadata};
use crate::sink::{LogSink, Submission};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Configuration for [`MonitorSink`], fixed at construction.
#[derive(Clone, Debug)]
pub struct SinkConfig {
    /// Identifies the caller to the monitoring backend. May be empty;
    /// whether an empty key is usable is the client's decision, not ours.
    pub credential_key: String,
    /// Passed opaquely to the default client. See [`crate::http`] for the
    /// keys the built-in HTTP client recognizes.
    pub client_options: Metadata,
    /// Adapter identifier.
    pub name: String,
    /// Suppress all output.
    pub silent: bool,
    /// Default minimum level, exposed through [`LogSink::level`].
    pub level: String,
    /// Source level name to destination severity. A level missing here is
    /// silently dropped, never an error.
    pub levels_map: BTreeMap<String, String>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        SinkConfig {
            credential_key: std::env::var(crate::env::MONITOR_SINK_API_KEY_ENV)
                .unwrap_or_default(),
            client_options: Metadata::new(),
            name: "monitor".to_string(),
            silent: false,
            level: "info".to_string(),
            levels_map: default_levels_map(),
        }
    }
}

/// The fixed default mapping from source level names to backend severities.
pub fn default_levels_map() -> BTreeMap<String, String> {
    [
        ("silly", "info"),
        ("verbose", "info"),
        ("info", "info"),
        ("debug", "info"),
        ("warn", "warning"),
        ("error", "error"),
    ]
    .into_iter()
    .map(|(level, severity)| (level.to_string(), severity.to_string()))
    .collect()
}

/// Error type returned when building a sink's default client.
#[derive(thiserror::Error, Debug)]
pub enum SinkBuildError {
    #[error("http feature is not enabled; inject a client with `with_client`")]
    HttpFeatureDisabled,

    #[cfg(feature = "http")]
    #[error("failed to build the http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Translator/forwarder: maps log records to telemetry events and hands them
/// to a [`NotifyClient`].
///
/// Stateless per call aside from the configuration and client set at
/// construction, both read-only afterwards. Concurrent submissions race
/// independently through the client; no ordering is imposed.
pub struct MonitorSink {
    config: SinkConfig,
    client: Arc<dyn NotifyClient>,
}

impl MonitorSink {
    /// Build a sink with the default HTTP client, constructed from the
    /// configuration's credential key and client options.
    ///
    /// **Returns**
    /// - `Err(SinkBuildError::HttpFeatureDisabled)` when the crate was built
    ///   without the `http` feature; inject a client via [`with_client`]
    ///   instead.
    /// - `Err(SinkBuildError::Client(..))` when the HTTP client itself
    ///   fails to build.
    ///
    /// [`with_client`]: MonitorSink::with_client
    pub fn new(config: SinkConfig) -> Result<Self, SinkBuildError> {
        #[cfg(feature = "http")]
        {
            let client =
                crate::http::HttpClient::new(&config.credential_key, &config.client_options)?;
            Ok(MonitorSink::with_client(config, Arc::new(client)))
        }

        #[cfg(not(feature = "http"))]
        {
            let _ = config;
            Err(SinkBuildError::HttpFeatureDisabled)
        }
    }

    /// Reuse a pre-built notification client instead of constructing one.
    pub fn with_client(config: SinkConfig, client: Arc<dyn NotifyClient>) -> Self {
        MonitorSink { config, client }
    }

    pub fn config(&self) -> &SinkConfig {
        &self.config
    }

    /// Translate one record and hand it to the client.
    ///
    /// Suppressed outright when the sink is silent or `level` has no entry
    /// in the levels map. Otherwise the client's notify is called exactly
    /// once and its outcome is deliberately not observed: the logging caller
    /// is never blocked or failed by delivery problems.
    pub async fn submit(&self, level: &str, message: Message, metadata: Metadata) -> Submission {
        if self.config.silent {
            return Submission::Suppressed;
        }

        let severity = match self.config.levels_map.get(level) {
            Some(severity) => severity,
            None => return Submission::Suppressed,
        };

        let (text, event) = translate(severity, message, metadata);
        let _ = self.client.notify(&text, &event).await;
        Submission::Forwarded
    }
}

#[async_trait]
impl LogSink for MonitorSink {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn level(&self) -> &str {
        &self.config.level
    }

    fn silent(&self) -> bool {
        self.config.silent
    }

    async fn log(&self, level: &str, message: Message, metadata: Metadata) -> Submission {
        self.submit(level, message, metadata).await
    }
}
