//! Errors in the crate.
use thiserror::Error;

/// Errors raised by this crate.
#[derive(Debug, Error)]
pub enum VpgError {
    /// The requested key does not exist in a record.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// The value under the requested key has an unexpected type.
    #[error("Record value type error: expected {0}")]
    RecordValueTypeError(String),

    /// The episode buffer cannot hold more transitions.
    #[error("Episode buffer capacity ({0}) exceeded")]
    EpisodeBufferOverflow(usize),

    /// The episode buffer was drained while empty.
    #[error("Episode buffer is empty")]
    EmptyEpisodeBuffer,
}
