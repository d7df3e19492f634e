pub mod record;
pub mod event;
pub mod client;
pub mod sink;
pub mod forwarder;
pub mod layer;

#[cfg(feature = "http")]
pub mod http;

pub mod init;
pub mod env;
pub mod noop_client;
