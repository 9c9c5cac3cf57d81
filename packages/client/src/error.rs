//! Error types for the watch-party client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server URL could not be parsed
    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Could not open the WebSocket connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An established connection was lost
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    /// Failed to serialize an outbound message
    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    /// Unrecognized prompt input
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Gave up after the configured number of reconnection attempts
    #[error("Failed to reconnect after {0} attempts")]
    ReconnectExhausted(u32),
}
