//! Errors raised while pulling bytes from the underlying source.

use std::io;

/// Failure reading snippet input.
///
/// These are never produced by malformed snippet syntax; grammar errors are
/// the parser's concern.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The underlying reader failed.
    #[error("failed to read snippet input at offset {offset}")]
    Io {
        /// Byte offset of the first byte that could not be read.
        offset: usize,
        #[source]
        source: io::Error,
    },
    /// A captured span is not valid UTF-8.
    #[error("snippet input is not valid UTF-8 at offset {offset}")]
    InvalidUtf8 {
        /// Byte offset of the first invalid byte.
        offset: usize,
    },
}

impl SourceError {
    /// Byte offset in the input where the failure was detected.
    pub fn offset(&self) -> usize {
        match self {
            SourceError::Io { offset, .. } | SourceError::InvalidUtf8 { offset } => *offset,
        }
    }
}
