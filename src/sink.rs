use crate::record::{Message, Metadata};
use async_trait::async_trait;

/// Outcome of one log submission.
///
/// These are the only two outcomes a caller can observe: the adapter never
/// fails the logging caller, and delivery results stay with the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Dropped without touching the client: silent mode, or a level with no
    /// entry in the levels map.
    Suppressed,
    /// Handed to the client's notify call. Says nothing about delivery.
    Forwarded,
}

/// Capability contract a pluggable logging-sink registry expects of a sink.
///
/// Hosts construct a concrete sink and register it explicitly with their
/// logging setup (see [`crate::init`]); there is no ambient registry.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Identifier for host-side bookkeeping.
    fn name(&self) -> &str;

    /// Default minimum level the host should route to this sink.
    fn level(&self) -> &str;

    /// When true, the sink acknowledges records without forwarding anything.
    fn silent(&self) -> bool;

    /// Submit one record.
    ///
    /// Completion of the returned future is the only "handed off" signal.
    /// The future always resolves, resolves exactly once per call, and
    /// never carries an error.
    async fn log(&self, level: &str, message: Message, metadata: Metadata) -> Submission;
}
