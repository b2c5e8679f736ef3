//! Error types for the relay.

/// Top-level error type for the relay.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Task queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Bus source error: {0}")]
    Source(#[from] SourceError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Task queue submission errors.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Broker request failed: {0}")]
    Transport(String),

    #[error("Broker rejected submission with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Message bus source errors.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Bus connection failed: {0}")]
    Connect(String),

    #[error("Bus stream failed: {0}")]
    Stream(String),
}

/// Result type alias for the relay.
pub type Result<T> = std::result::Result<T, Error>;
