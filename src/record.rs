use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::backtrace::Backtrace;

/// Metadata bag attached to a log record: an open JSON object.
///
/// Recognized sub-keys are `metadata`/`metaData` (nested bag merged by the
/// translator), `error` (an attached error object whose extra fields are
/// lifted into `custom`), `err` and `custom`. Everything else passes through
/// to the emitted event untouched.
pub type Metadata = serde_json::Map<String, Value>;

/// Structured stand-in for a duck-typed "error-like" value: anything that
/// exposes `stack`, `message` and `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorLike {
    pub name: String,
    pub message: String,
    pub stack: String,
}

impl ErrorLike {
    pub fn new(
        name: impl Into<String>,
        message: impl Into<String>,
        stack: impl Into<String>,
    ) -> Self {
        ErrorLike {
            name: name.into(),
            message: message.into(),
            stack: stack.into(),
        }
    }

    /// Build an [`ErrorLike`] from any `std::error::Error`.
    ///
    /// The type name stands in for the error's `name` and a backtrace
    /// captured at the call site for its `stack`. Capture honors
    /// `RUST_BACKTRACE`; when disabled the stack is a one-line marker.
    pub fn from_error<E: std::error::Error>(err: &E) -> Self {
        ErrorLike {
            name: std::any::type_name::<E>().to_string(),
            message: err.to_string(),
            stack: Backtrace::capture().to_string(),
        }
    }
}

/// Message of a log record: plain text or a structured error.
///
/// Callers say up front which one they are passing; nothing sniffs value
/// shapes at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Text(String),
    Error(ErrorLike),
}

impl Message {
    /// The text that ends up as the forwarded notify message: the string
    /// itself, or the error's message.
    pub fn text(&self) -> &str {
        match self {
            Message::Text(text) => text,
            Message::Error(err) => &err.message,
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl From<ErrorLike> for Message {
    fn from(err: ErrorLike) -> Self {
        Message::Error(err)
    }
}

/// Capability check for a metadata map that is itself an error: all three of
/// `stack`, `message` and `name` must be present.
///
/// Non-string values are rendered through their JSON text so a numeric
/// `message` still produces something readable.
pub fn error_shape(meta: &Metadata) -> Option<ErrorLike> {
    let stack = meta.get("stack")?;
    let message = meta.get("message")?;
    let name = meta.get("name")?;
    Some(ErrorLike {
        name: value_text(name),
        message: value_text(message),
        stack: value_text(stack),
    })
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One log submission, as produced by the tracing layer and consumed by the
/// forwarder.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub message: Message,
    pub metadata: Metadata,
}
