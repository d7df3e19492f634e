/// Environment variable names used by this crate for convenient
/// configuration of sinks from microservices.
///
/// These are purely helpers; the core sink types remain decoupled from
/// environment access apart from the documented defaults.

/// Credential key identifying the caller to the monitoring backend. Read by
/// `SinkConfig::default` when no key is configured explicitly.
pub const MONITOR_SINK_API_KEY_ENV: &str = "MONITOR_SINK_API_KEY";

/// Notify endpoint URL for the built-in HTTP client, e.g.
/// `https://notify.monitoring.example/events`.
pub const MONITOR_SINK_ENDPOINT_ENV: &str = "MONITOR_SINK_ENDPOINT";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
