//! Error types.

/// Errors surfaced by configuration. Splitting itself never fails.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("max_chars must be at least 1")]
    ZeroMaxChars,

    #[error("min_chunk_size {min_chunk_size} exceeds max_chars {max_chars}")]
    MinChunkTooLarge {
        min_chunk_size: usize,
        max_chars: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
