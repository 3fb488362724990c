//! Fixed-size refillable window over a byte source.
//!
//! The window holds a single byte of lookahead. `current` always reflects
//! the byte at `index - 1`, or `None` once the source is exhausted. All
//! grammar-significant characters in the snippet syntax are ASCII, so the
//! window works on bytes; multi-byte UTF-8 sequences only ever appear inside
//! captured text and are validated when the capture ends.

use std::borrow::Cow;
use std::io::{self, Read};
use std::num::NonZeroUsize;

use tracing::trace;

use crate::{buffer_size_for_len, Location, SourceError};

/// Buffered window over a [`Read`] source with capture-span tracking.
///
/// Created with [`SourceWindow::open`], which primes the first byte so that
/// [`current()`](Self::current) is valid immediately.
///
/// # Invariants
///
/// - `index >= 1` after priming: either a byte was consumed, or the source
///   is exhausted and `index` was bumped past the (empty) fill.
/// - While a capture is open, `capture_start <= index - 1 <= fill`.
/// - Bytes of an open capture that leave the window on refill are appended
///   to `capture_overflow` before the window is overwritten.
#[derive(Debug)]
pub struct SourceWindow<R> {
    reader: R,
    buf: Box<[u8]>,
    /// Absolute offset of `buf[0]` in the input.
    buffer_offset: usize,
    /// Index of the next byte to consume.
    index: usize,
    /// Number of valid bytes in `buf`.
    fill: usize,
    /// Byte at `index - 1`, `None` at end of input.
    current: Option<u8>,
    line: usize,
    /// Absolute offset of the first byte of `line`.
    line_offset: usize,
    capture_start: Option<usize>,
    /// Absolute offset where the open capture began.
    capture_origin: usize,
    capture_overflow: Vec<u8>,
}

impl<'a> SourceWindow<&'a [u8]> {
    /// Open a window over an in-memory string.
    ///
    /// The window is sized with [`buffer_size_for_len`]. Reading from a
    /// byte slice cannot fail, so the only error possible afterwards is
    /// [`SourceError::InvalidUtf8`], which a `&str` input never produces.
    pub fn for_str(source: &'a str) -> Result<Self, SourceError> {
        Self::open(source.as_bytes(), buffer_size_for_len(source.len()))
    }
}

impl<R: Read> SourceWindow<R> {
    /// Open a window of `buffer_size` bytes over `reader` and read the first byte.
    pub fn open(reader: R, buffer_size: NonZeroUsize) -> Result<Self, SourceError> {
        let mut window = SourceWindow {
            reader,
            buf: vec![0; buffer_size.get()].into_boxed_slice(),
            buffer_offset: 0,
            index: 0,
            fill: 0,
            current: None,
            line: 1,
            line_offset: 0,
            capture_start: None,
            capture_origin: 0,
            capture_overflow: Vec::new(),
        };
        window.advance()?;
        Ok(window)
    }

    /// The byte most recently read, or `None` at end of input.
    #[inline]
    pub fn current(&self) -> Option<u8> {
        self.current
    }

    /// Returns `true` if the current byte is `byte`.
    #[inline]
    pub fn is(&self, byte: u8) -> bool {
        self.current == Some(byte)
    }

    /// Returns `true` once the source is exhausted.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.current.is_none()
    }

    /// Size of the window in bytes.
    pub fn buffer_size(&self) -> usize {
        self.buf.len()
    }

    /// Advance to the next byte, refilling the window when it is exhausted.
    ///
    /// Does nothing at end of input.
    #[inline]
    pub fn read(&mut self) -> Result<(), SourceError> {
        if self.is_eof() {
            return Ok(());
        }
        self.advance()
    }

    fn advance(&mut self) -> Result<(), SourceError> {
        if self.index == self.fill {
            if let Some(start) = self.capture_start {
                self.capture_overflow
                    .extend_from_slice(&self.buf[start..self.fill]);
                self.capture_start = Some(0);
            }
            self.buffer_offset += self.fill;
            self.fill = self.refill()?;
            self.index = 0;
            trace!(
                buffer_offset = self.buffer_offset,
                fill = self.fill,
                overflow = self.capture_overflow.len(),
                "refill"
            );
            if self.fill == 0 {
                self.current = None;
                self.index = 1;
                return Ok(());
            }
        }
        if self.current == Some(b'\n') {
            self.line += 1;
            self.line_offset = self.buffer_offset + self.index;
        }
        self.current = Some(self.buf[self.index]);
        self.index += 1;
        Ok(())
    }

    fn refill(&mut self) -> Result<usize, SourceError> {
        loop {
            match self.reader.read(&mut self.buf) {
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(source) => {
                    return Err(SourceError::Io {
                        offset: self.buffer_offset,
                        source,
                    })
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Capture
    // ─────────────────────────────────────────────────────────────────────

    /// Start capturing at the current byte.
    ///
    /// The current byte is the first byte of the captured span.
    #[inline]
    pub fn start_capture(&mut self) {
        debug_assert!(self.index >= 1, "window must be primed before capturing");
        let start = self.index - 1;
        self.capture_start = Some(start);
        self.capture_origin = self.buffer_offset + start;
    }

    /// Finish the open capture, excluding the current byte.
    ///
    /// Borrows directly from the window when the span never left it;
    /// otherwise returns the overflow accumulator joined with the final
    /// window slice and clears the accumulator. Returns an empty string if
    /// no capture is open.
    pub fn end_capture(&mut self) -> Result<Cow<'_, str>, SourceError> {
        let Some(start) = self.capture_start.take() else {
            return Ok(Cow::Borrowed(""));
        };
        let end = self.index - 1;
        if self.capture_overflow.is_empty() {
            return match std::str::from_utf8(&self.buf[start..end]) {
                Ok(text) => Ok(Cow::Borrowed(text)),
                Err(err) => Err(SourceError::InvalidUtf8 {
                    offset: self.buffer_offset + start + err.valid_up_to(),
                }),
            };
        }
        self.capture_overflow
            .extend_from_slice(&self.buf[start..end]);
        let bytes = std::mem::take(&mut self.capture_overflow);
        String::from_utf8(bytes)
            .map(Cow::Owned)
            .map_err(|err| SourceError::InvalidUtf8 {
                offset: self.capture_origin + err.utf8_error().valid_up_to(),
            })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Location
    // ─────────────────────────────────────────────────────────────────────

    /// Location of the current byte (one past the input at end of input).
    pub fn location(&self) -> Location {
        let offset = self.buffer_offset + self.index - 1;
        Location {
            offset,
            line: self.line,
            column: offset - self.line_offset + 1,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
