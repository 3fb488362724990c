use std::fmt;

/// Position of the character most recently consumed from a [`SourceWindow`].
///
/// `offset` is a zero-based byte offset from the start of the input;
/// `line` and `column` are one-based, with the column counted in bytes
/// from the start of the line.
///
/// [`SourceWindow`]: crate::SourceWindow
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Location of the first character of an input.
    pub const START: Location = Location {
        offset: 0,
        line: 1,
        column: 1,
    };
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
