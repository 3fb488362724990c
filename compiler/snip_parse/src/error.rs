//! Parse error types.
//!
//! Two kinds of failure abort a parse:
//! - **Grammar errors** ([`ParseError`]): the input does not match the
//!   snippet grammar. Always fatal, always located.
//! - **Source errors** ([`SourceError`]): the underlying reader failed or
//!   produced invalid UTF-8. Propagated unchanged.
//!
//! Neither is recovered from. A partially decoded snippet has no safe
//! meaning for template insertion.

use std::fmt;

use snip_source::{Location, SourceError};

/// What the parser required at the point of failure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Expected {
    /// A specific terminator such as `}` or `|`.
    Char(char),
    /// A decimal digit.
    Digit,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Char(c) => write!(f, "'{c}'"),
            Expected::Digit => f.write_str("digit"),
        }
    }
}

/// Classification of a grammar error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A required character was missing.
    Expected(Expected),
    /// Input ended while a construct was still open.
    UnexpectedEndOfInput,
    /// Characters remained after the snippet was complete.
    UnexpectedCharacter,
    /// A tabstop index does not fit in `u32`.
    IntegerOverflow,
}

impl ParseErrorKind {
    /// Human-readable message, without location.
    pub fn message(&self) -> String {
        match self {
            ParseErrorKind::Expected(expected) => format!("Expected {expected}"),
            ParseErrorKind::UnexpectedEndOfInput => "Unexpected end of input".to_owned(),
            ParseErrorKind::UnexpectedCharacter => "Unexpected character".to_owned(),
            ParseErrorKind::IntegerOverflow => "Integer too large".to_owned(),
        }
    }
}

/// A grammar error with the location of the offending character.
///
/// At end of input the location points one past the last byte.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{} at {location}", .kind.message())]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub location: Location,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, location: Location) -> Self {
        ParseError { kind, location }
    }

    pub fn message(&self) -> String {
        self.kind.message()
    }

    /// Zero-based byte offset.
    pub fn offset(&self) -> usize {
        self.location.offset
    }

    /// One-based line.
    pub fn line(&self) -> usize {
        self.location.line
    }

    /// One-based column, in bytes.
    pub fn column(&self) -> usize {
        self.location.column
    }
}

/// Any failure of a parse call.
#[derive(Debug, thiserror::Error)]
pub enum SnippetError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl SnippetError {
    /// Byte offset in the input where the failure was detected.
    pub fn offset(&self) -> usize {
        match self {
            SnippetError::Parse(err) => err.offset(),
            SnippetError::Source(err) => err.offset(),
        }
    }

    /// The grammar error, if this is one.
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            SnippetError::Parse(err) => Some(err),
            SnippetError::Source(_) => None,
        }
    }
}
