use thiserror::Error;

/// Failure to read chat-network event content.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Invalid event content: {0}")]
    InvalidContent(#[from] serde_json::Error),
}
