//! Size limits applied when reading a Block from a byte source.

use crate::error::{Error, Result};

/// Default cap on the declared value length of a Block read from a stream.
pub const MAX_SIZE_OF_BLOCK_FROM_STREAM: usize = 8800;

/// Limits for the stream construction paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadLimits {
    /// Largest declared value length accepted before any value octet is read.
    pub max_block_size: usize,
}

impl ReadLimits {
    /// Create limits with the given cap.
    pub const fn new(max_block_size: usize) -> Self {
        Self { max_block_size }
    }

    /// Validate a declared length against the cap.
    pub(crate) fn check_length(&self, length: u64) -> Result<usize> {
        match usize::try_from(length) {
            Ok(length) if length <= self.max_block_size => Ok(length),
            _ => {
                tracing::debug!(
                    length,
                    max = self.max_block_size,
                    "rejecting block from stream"
                );
                Err(Error::Format(format!(
                    "length of block from stream is too large ({} > {})",
                    length, self.max_block_size
                )))
            }
        }
    }
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self {
            max_block_size: MAX_SIZE_OF_BLOCK_FROM_STREAM,
        }
    }
}
