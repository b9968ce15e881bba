//! Error types for the extraction pipeline.

use thiserror::Error;

/// All fatal errors produced by the pipeline.
///
/// Unsupported attachment content types are not an error; those parts
/// are skipped and logged.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The raw message object is missing or the store is unreachable.
    #[error("failed to fetch stored message '{key}': {reason}")]
    Fetch { key: String, reason: String },

    /// The message body could not be parsed as valid mail content.
    #[error("failed to parse message: {0}")]
    Parse(String),

    /// An attachment could not be persisted, or the write acknowledgment
    /// carried no content checksum.
    #[error("failed to persist attachment '{key}': {reason}")]
    StorageWrite { key: String, reason: String },

    /// The trigger event is malformed or carries no records.
    #[error("invalid receipt event: {0}")]
    Event(String),
}

/// Convenience alias for `Result<T, ExtractError>`.
pub type Result<T> = std::result::Result<T, ExtractError>;
