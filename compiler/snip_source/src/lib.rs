//! Streaming input for the snippet parser.
//!
//! Snippet text arrives either as an in-memory string or through an
//! arbitrary [`std::io::Read`] source. Both are consumed through a
//! [`SourceWindow`]: a fixed-size byte window that is refilled on demand,
//! with a single byte of lookahead (`current`) and lazily extracted
//! capture spans.
//!
//! # Capture Spans
//!
//! A capture records where a token starts inside the window. When the token
//! ends inside the same window the captured text is borrowed straight from
//! the window. When a refill happens while a capture is open, the bytes seen
//! so far are spilled into an overflow accumulator so nothing is lost across
//! the window boundary.
//!
//! ```text
//!            buffer_offset
//!            v
//! [a|b|c|d|e|f|g|h|i|j|k|l|m|n|o|p|q|r|s|t]   < input
//!            [f|g|h|i|j|k|l|?|?|?]            < window
//!                   ^       ^
//!                   index   fill
//! ```

mod error;
mod location;
mod window;

pub use error::SourceError;
pub use location::Location;
pub use window::SourceWindow;

use std::num::NonZeroUsize;

/// Window size used for streaming readers.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Smallest window used for in-memory strings.
pub const MIN_BUFFER_SIZE: usize = 10;

/// Window size for an in-memory input of `len` bytes.
///
/// Short strings get a window of at least [`MIN_BUFFER_SIZE`] bytes, long
/// strings are capped at [`DEFAULT_BUFFER_SIZE`].
pub fn buffer_size_for_len(len: usize) -> NonZeroUsize {
    let size = len.clamp(MIN_BUFFER_SIZE, DEFAULT_BUFFER_SIZE);
    NonZeroUsize::new(size).unwrap_or(NonZeroUsize::MIN)
}
