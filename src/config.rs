//! Splitter configuration.

use crate::error::{Error, Result};

/// Per-message ceiling of the downstream messaging protocol.
pub const DEFAULT_MAX_CHARS: usize = 4096;

/// Below this much free room a long word moves to the next chunk whole
/// instead of leaving a ragged fragment behind.
pub const DEFAULT_MIN_CHUNK_SIZE: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitConfig {
    /// Hard ceiling on chunk length, in chars.
    pub max_chars: usize,
    /// Anti-fragmentation threshold, in chars.
    pub min_chunk_size: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            min_chunk_size: DEFAULT_MIN_CHUNK_SIZE,
        }
    }
}

impl SplitConfig {
    /// Validated constructor.
    pub fn new(max_chars: usize, min_chunk_size: usize) -> Result<Self> {
        Self::default()
            .with_max_chars(max_chars)
            .with_min_chunk_size(min_chunk_size)
            .validate()
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub fn with_min_chunk_size(mut self, min_chunk_size: usize) -> Self {
        self.min_chunk_size = min_chunk_size;
        self
    }

    pub fn validate(self) -> Result<Self> {
        if self.max_chars == 0 {
            return Err(Error::ZeroMaxChars);
        }
        if self.min_chunk_size > self.max_chars {
            return Err(Error::MinChunkTooLarge {
                min_chunk_size: self.min_chunk_size,
                max_chars: self.max_chars,
            });
        }
        Ok(self)
    }
}
