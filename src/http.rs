use crate::client::NotifyClient;
use crate::env::{env_or, MONITOR_SINK_ENDPOINT_ENV};
use crate::event::TelemetryEvent;
use crate::record::Metadata;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::error::Error;
use std::time::Duration;

/// Endpoint used when neither client options nor the environment provide one.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8127/notify";

const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Built-in [`NotifyClient`]: posts one JSON payload per event to the
/// backend's notify endpoint.
///
/// Recognized `client_options` keys:
/// - `endpoint` (string): notify URL. Falls back to the
///   `MONITOR_SINK_ENDPOINT` environment variable, then [`DEFAULT_ENDPOINT`].
/// - `timeout_ms` (number): per-request timeout, default 5000.
///
/// Unrecognized keys are ignored, keeping the options bag opaque to the
/// forwarder.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    endpoint: String,
    credential_key: String,
}

impl HttpClient {
    /// Construct a client from a credential key and the opaque options bag.
    ///
    /// An empty credential key is accepted; the backend decides whether an
    /// unauthenticated notify is usable.
    ///
    /// **Returns**
    /// - `Err(..)` if the underlying HTTP client could not be built (e.g.
    ///   no TLS backend available).
    pub fn new(credential_key: &str, options: &Metadata) -> Result<Self, reqwest::Error> {
        let endpoint = options
            .get("endpoint")
            .and_then(|value| value.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| env_or(MONITOR_SINK_ENDPOINT_ENV, DEFAULT_ENDPOINT));

        let timeout_ms = options
            .get("timeout_ms")
            .and_then(|value| value.as_u64())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            credential_key: credential_key.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn payload<'a>(
        &'a self,
        message: &'a str,
        event: &'a TelemetryEvent,
        sent_at: DateTime<Utc>,
    ) -> NotifyPayload<'a> {
        NotifyPayload {
            api_key: &self.credential_key,
            message,
            severity: &event.severity,
            meta_data: &event.meta_data,
            sent_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NotifyPayload<'a> {
    api_key: &'a str,
    message: &'a str,
    severity: &'a str,
    meta_data: &'a Metadata,
    sent_at: DateTime<Utc>,
}

#[async_trait]
impl NotifyClient for HttpClient {
    async fn notify(
        &self,
        message: &str,
        event: &TelemetryEvent,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let payload = self.payload(message, event, Utc::now());
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
            Err(format!("notify failed with status {}: {}", status, text).into())
        }
    }
}
