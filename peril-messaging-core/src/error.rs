// peril-messaging-core/src/error.rs
use thiserror::Error;

/// Everything that can go wrong between a value and the broker.
///
/// `Connection`, `Topology` and `Subscribe` are startup failures and are
/// fatal for the caller. `Publish` covers a single message, including one
/// that could not be encoded.
#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("topology error: {0}")]
    Topology(String),

    #[error("publish error: {0}")]
    Publish(String),

    #[error("subscribe error: {0}")]
    Subscribe(String),
}
