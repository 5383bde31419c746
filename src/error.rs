use thiserror::Error;

/// Errors surfaced by the publisher. All of them are terminal for a single
/// invocation; an unreachable peer is never one of them.
#[derive(Debug, Error)]
pub enum PublisherError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("invalid endpoint {endpoint}: {reason}")]
    Address { endpoint: String, reason: String },

    #[error("send queue is full ({capacity} messages)")]
    QueueFull { capacity: u32 },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse config file: {0}")]
    ConfigFile(#[from] serde_yaml::Error),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode envelope: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("failed to decode envelope: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("publisher task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("transport failure: {0}")]
    Transport(#[from] zmq::Error),
}
