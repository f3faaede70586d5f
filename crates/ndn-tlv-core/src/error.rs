//! Error types for TLV Block operations.

use thiserror::Error;

/// Errors that can occur while decoding, encoding, or querying a Block.
#[derive(Debug, Error)]
pub enum Error {
    /// The TLV header or declared length is inconsistent with the available bytes.
    #[error("TLV format error: {0}")]
    Format(String),

    /// A structurally incomplete Block cannot be serialized or sized.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A requested child type is absent.
    #[error("requested a non-existent type [{tlv_type}] from Block")]
    NotFound { tlv_type: u32 },

    /// The byte source failed for a reason other than running out of data.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this is a format error.
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }

    /// Check if this is an encoding error.
    pub fn is_encoding(&self) -> bool {
        matches!(self, Error::Encoding(_))
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Result type for TLV operations.
pub type Result<T> = std::result::Result<T, Error>;
