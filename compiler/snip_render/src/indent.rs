//! Indent normalization.
//!
//! Snippets are written with `\t` for one indent level and `\n` for line
//! breaks. Before insertion both are rewritten for the target editor: tabs
//! become a run of spaces when the editor indents with spaces, and newlines
//! become the document's line separator.

use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;

/// Line separator of the target document.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LineSeparator {
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
    /// `\r`
    Cr,
    /// Any other separator the host reports.
    Custom(String),
}

impl LineSeparator {
    pub fn as_str(&self) -> &str {
        match self {
            LineSeparator::Lf => "\n",
            LineSeparator::CrLf => "\r\n",
            LineSeparator::Cr => "\r",
            LineSeparator::Custom(s) => s,
        }
    }

    /// Parse `lf`, `crlf` or `cr` (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "lf" => Some(LineSeparator::Lf),
            "crlf" => Some(LineSeparator::CrLf),
            "cr" => Some(LineSeparator::Cr),
            _ => None,
        }
    }

    /// Map a literal separator string to its variant.
    pub fn from_literal(separator: &str) -> Self {
        match separator {
            "\n" => LineSeparator::Lf,
            "\r\n" => LineSeparator::CrLf,
            "\r" => LineSeparator::Cr,
            other => LineSeparator::Custom(other.to_owned()),
        }
    }
}

impl fmt::Display for LineSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LineSeparator::Lf => "lf",
            LineSeparator::CrLf => "crlf",
            LineSeparator::Cr => "cr",
            LineSeparator::Custom(_) => "custom",
        })
    }
}

/// Indentation settings of the target editor.
///
/// Immutable once built. The run of `tab_size` spaces that replaces each tab
/// is computed on first use and reused for every later fragment.
#[derive(Clone, Debug)]
pub struct IndentOptions {
    tab_size: usize,
    insert_spaces: bool,
    line_separator: Option<LineSeparator>,
    spaces: OnceLock<String>,
}

impl IndentOptions {
    /// An empty custom separator counts as no separator.
    pub fn new(tab_size: usize, insert_spaces: bool, line_separator: Option<LineSeparator>) -> Self {
        let line_separator =
            line_separator.filter(|sep| !matches!(sep, LineSeparator::Custom(s) if s.is_empty()));
        IndentOptions {
            tab_size,
            insert_spaces,
            line_separator,
            spaces: OnceLock::new(),
        }
    }

    /// Options for inserting `snippet`, or `None` when it contains neither
    /// a tab nor a newline and so needs no formatting at all.
    pub fn for_snippet(
        snippet: &str,
        tab_size: usize,
        insert_spaces: bool,
        line_separator: Option<LineSeparator>,
    ) -> Option<Self> {
        should_be_formatted(snippet).then(|| Self::new(tab_size, insert_spaces, line_separator))
    }

    pub fn tab_size(&self) -> usize {
        self.tab_size
    }

    pub fn insert_spaces(&self) -> bool {
        self.insert_spaces
    }

    pub fn line_separator(&self) -> Option<&LineSeparator> {
        self.line_separator.as_ref()
    }

    fn spaces(&self) -> &str {
        self.spaces.get_or_init(|| " ".repeat(self.tab_size))
    }

    /// Rewrite the tabs and newlines of `text`.
    ///
    /// Returns `text` unchanged, without allocating, when it contains
    /// neither.
    pub fn format<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if !should_be_formatted(text) {
            return Cow::Borrowed(text);
        }
        let mut out = String::with_capacity(text.len() + text.len() / 4);
        let mut previous = None;
        for c in text.chars() {
            match c {
                '\t' if self.insert_spaces => out.push_str(self.spaces()),
                '\n' => match self.separator_for_newline(previous) {
                    Some(separator) => out.push_str(separator),
                    None => out.push('\n'),
                },
                _ => out.push(c),
            }
            previous = Some(c);
        }
        Cow::Owned(out)
    }

    /// The replacement for a `\n` that follows `previous`, or `None` to keep it.
    fn separator_for_newline(&self, previous: Option<char>) -> Option<&str> {
        let separator = self.line_separator.as_ref()?;
        if *separator == LineSeparator::CrLf && previous == Some('\r') {
            // Already a CRLF pair.
            return None;
        }
        Some(separator.as_str())
    }
}

/// True when `text` contains a tab or a newline.
#[inline]
pub fn should_be_formatted(text: &str) -> bool {
    memchr::memchr2(b'\t', b'\n', text.as_bytes()).is_some()
}

/// Format `text` with `options`, or return it unchanged when there are none.
pub fn format_text<'t>(text: &'t str, options: Option<&IndentOptions>) -> Cow<'t, str> {
    match options {
        Some(options) => options.format(text),
        None => Cow::Borrowed(text),
    }
}
