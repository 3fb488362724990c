//! Recursive-descent parser for snippet syntax.
//!
//! # Disambiguation
//!
//! Five constructs share the `$` prefix. After consuming `$` the parser
//! looks at one byte at a time:
//!
//! ```text
//! $ digit           -> tabstop         $1
//! $ { digit ... :   -> placeholder     ${1:default}
//! $ { digit ... |   -> choice          ${1|a,b|}
//! $ { digit ... }   -> tabstop         ${1}
//! $ { name ... |    -> named choice    ${name|a,b|}
//! $ { name }        -> variable        ${name}
//! $ name            -> variable        $name
//! ```
//!
//! Anything else starts a text run. Inside a placeholder body, text and bare
//! variable names also stop at `}`, which closes the body.

use std::io::Read;
use std::num::NonZeroUsize;

use snip_source::{buffer_size_for_len, SourceWindow, DEFAULT_BUFFER_SIZE};
use tracing::{debug, trace};

use crate::error::{Expected, ParseError, ParseErrorKind, SnippetError};
use crate::stack::ensure_sufficient_stack;
use crate::SnippetHandler;

/// Tunables for a [`SnippetParser`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ParserConfig {
    /// Window size in bytes.
    ///
    /// `None` sizes string inputs by their length (see
    /// [`buffer_size_for_len`]) and uses [`DEFAULT_BUFFER_SIZE`] for readers.
    pub buffer_size: Option<NonZeroUsize>,
}

impl ParserConfig {
    #[must_use]
    pub fn with_buffer_size(mut self, size: NonZeroUsize) -> Self {
        self.buffer_size = Some(size);
        self
    }

    fn reader_buffer_size(&self) -> NonZeroUsize {
        self.buffer_size
            .or(NonZeroUsize::new(DEFAULT_BUFFER_SIZE))
            .unwrap_or(NonZeroUsize::MIN)
    }
}

/// Parses snippets and reports their structure to a [`SnippetHandler`].
///
/// The parser itself holds only the handler and configuration. Each call to
/// [`parse_str`](Self::parse_str) or [`parse_reader`](Self::parse_reader)
/// builds fresh parse state that is dropped when the call returns.
#[derive(Debug)]
pub struct SnippetParser<H> {
    handler: H,
    config: ParserConfig,
}

impl<H: SnippetHandler> SnippetParser<H> {
    pub fn new(handler: H) -> Self {
        Self::with_config(handler, ParserConfig::default())
    }

    pub fn with_config(handler: H, config: ParserConfig) -> Self {
        SnippetParser { handler, config }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Parse an in-memory snippet.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn parse_str(&mut self, source: &str) -> Result<(), SnippetError> {
        let size = self
            .config
            .buffer_size
            .unwrap_or_else(|| buffer_size_for_len(source.len()));
        self.run(source.as_bytes(), size)
    }

    /// Read a snippet from `reader` and parse it.
    ///
    /// Reader failures abort the parse with [`SnippetError::Source`].
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse_reader<R: Read>(&mut self, reader: R) -> Result<(), SnippetError> {
        let size = self.config.reader_buffer_size();
        self.run(reader, size)
    }

    fn run<R: Read>(&mut self, reader: R, buffer_size: NonZeroUsize) -> Result<(), SnippetError> {
        debug!(buffer_size = buffer_size.get(), "parse");
        let source = SourceWindow::open(reader, buffer_size)?;
        let mut state = ParseState {
            source,
            handler: &mut self.handler,
            nesting: 0,
        };
        state.parse_snippet()
    }
}

/// Where [`ParseState::parse_any`] is being applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Scope {
    /// The whole snippet; ends at end of input.
    TopLevel,
    /// A placeholder body; ends at the closing `}`.
    Placeholder,
}

/// How a choice is labelled.
enum ChoiceLabel {
    Index(u32),
    Name(String),
}

/// State of a single parse call.
struct ParseState<'h, R, H> {
    source: SourceWindow<R>,
    handler: &'h mut H,
    nesting: u32,
}

impl<R: Read, H: SnippetHandler> ParseState<'_, R, H> {
    fn parse_snippet(&mut self) -> Result<(), SnippetError> {
        self.handler.start_snippet();
        self.parse_any(Scope::TopLevel)?;
        self.handler.end_snippet();
        if !self.source.is_eof() {
            return Err(self.error(ParseErrorKind::UnexpectedCharacter));
        }
        debug_assert_eq!(self.nesting, 0, "unbalanced placeholders");
        debug!(end = self.source.location().offset, "parse complete");
        Ok(())
    }

    /// `any*`, until end of input or the `}` closing the current placeholder.
    fn parse_any(&mut self, scope: Scope) -> Result<(), SnippetError> {
        loop {
            match self.source.current() {
                None if scope == Scope::Placeholder => {
                    return Err(self.expected(Expected::Char('}')));
                }
                None => return Ok(()),
                Some(b'}') if scope == Scope::Placeholder => {
                    self.source.read()?;
                    return Ok(());
                }
                Some(b'$') => self.parse_dollar(scope)?,
                Some(_) => self.parse_text(scope)?,
            }
        }
    }

    fn parse_dollar(&mut self, scope: Scope) -> Result<(), SnippetError> {
        self.source.read()?;
        if self.is_digit() {
            // $0, $10
            let index = self.read_int()?;
            trace!(index, "tabstop");
            self.handler.tabstop(index);
        } else if self.read_char(b'{')? {
            if self.is_digit() {
                let index = self.read_int()?;
                if self.read_char(b':')? {
                    // ${1:name}
                    self.parse_placeholder(index)?;
                } else if self.read_char(b'|')? {
                    // ${1|one,two,three|}
                    self.parse_choice(ChoiceLabel::Index(index))?;
                } else {
                    // ${1}
                    trace!(index, "tabstop");
                    self.handler.tabstop(index);
                    self.read_required(b'}')?;
                }
            } else {
                self.parse_braced_variable()?;
            }
        } else {
            self.parse_bare_variable(scope)?;
        }
        Ok(())
    }

    fn parse_placeholder(&mut self, index: u32) -> Result<(), SnippetError> {
        self.source.start_capture();
        self.skip_until(b"}$")?;
        self.nesting += 1;
        let level = self.nesting;
        let name = self.source.end_capture()?;
        trace!(index, level, name = %name, "placeholder");
        self.handler.start_placeholder(index, &name, level);
        if self.source.is(b'}') {
            self.source.read()?;
        } else {
            ensure_sufficient_stack(|| self.parse_any(Scope::Placeholder))?;
        }
        self.handler.end_placeholder(level);
        self.nesting -= 1;
        Ok(())
    }

    fn parse_choice(&mut self, label: ChoiceLabel) -> Result<(), SnippetError> {
        let mut options = Vec::new();
        let mut option = self.read_option()?;
        while !option.is_empty() {
            options.push(option);
            if self.read_char(b',')? {
                option = self.read_option()?;
            } else {
                break;
            }
        }
        trace!(count = options.len(), "choice");
        match label {
            ChoiceLabel::Index(index) => self.handler.choice(index, &options),
            ChoiceLabel::Name(name) => self.handler.named_choice(&name, &options),
        }
        self.read_required(b'|')?;
        self.read_required(b'}')
    }

    fn read_option(&mut self) -> Result<String, SnippetError> {
        self.source.start_capture();
        self.skip_until(b",|")?;
        Ok(self.source.end_capture()?.into_owned())
    }

    /// `${name}` or `${name|one,two|}`, after the `{`.
    fn parse_braced_variable(&mut self) -> Result<(), SnippetError> {
        self.source.start_capture();
        self.skip_until(b"}|")?;
        if self.source.is(b'|') {
            let name = self.source.end_capture()?.into_owned();
            self.source.read()?;
            return self.parse_choice(ChoiceLabel::Name(name));
        }
        let name = self.source.end_capture()?;
        trace!(name = %name, "variable");
        self.handler.variable(&name);
        self.read_required(b'}')
    }

    /// `$name`, after the `$`.
    ///
    /// A `$` with no name after it is literal text.
    fn parse_bare_variable(&mut self, scope: Scope) -> Result<(), SnippetError> {
        let stops: &[u8] = match scope {
            Scope::TopLevel => b"$ ",
            Scope::Placeholder => b"$ }",
        };
        self.source.start_capture();
        self.skip_until(stops)?;
        let name = self.source.end_capture()?;
        if name.is_empty() {
            self.handler.text("$");
        } else {
            trace!(name = %name, "variable");
            self.handler.variable(&name);
        }
        Ok(())
    }

    fn parse_text(&mut self, scope: Scope) -> Result<(), SnippetError> {
        let stops: &[u8] = match scope {
            Scope::TopLevel => b"$",
            Scope::Placeholder => b"$}",
        };
        self.source.start_capture();
        self.skip_until(stops)?;
        let text = self.source.end_capture()?;
        self.handler.text(&text);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lexical helpers
    // ─────────────────────────────────────────────────────────────────────

    /// Advance until the current byte is one of `stops` or input ends.
    fn skip_until(&mut self, stops: &[u8]) -> Result<(), SnippetError> {
        while let Some(byte) = self.source.current() {
            if stops.contains(&byte) {
                break;
            }
            self.source.read()?;
        }
        Ok(())
    }

    /// `[0-9]+`. A leading `0` is a complete integer on its own.
    fn read_int(&mut self) -> Result<u32, SnippetError> {
        let location = self.source.location();
        self.source.start_capture();
        let first = self.source.current();
        if !self.read_digit()? {
            return Err(self.expected(Expected::Digit));
        }
        if first != Some(b'0') {
            while self.read_digit()? {}
        }
        let digits = self.source.end_capture()?;
        digits
            .parse::<u32>()
            .map_err(|_| ParseError::new(ParseErrorKind::IntegerOverflow, location).into())
    }

    fn read_required(&mut self, byte: u8) -> Result<(), SnippetError> {
        if self.read_char(byte)? {
            Ok(())
        } else {
            Err(self.expected(Expected::Char(char::from(byte))))
        }
    }

    fn read_char(&mut self, byte: u8) -> Result<bool, SnippetError> {
        if !self.source.is(byte) {
            return Ok(false);
        }
        self.source.read()?;
        Ok(true)
    }

    fn read_digit(&mut self) -> Result<bool, SnippetError> {
        if !self.is_digit() {
            return Ok(false);
        }
        self.source.read()?;
        Ok(true)
    }

    #[inline]
    fn is_digit(&self) -> bool {
        self.source.current().is_some_and(|b| b.is_ascii_digit())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Errors
    // ─────────────────────────────────────────────────────────────────────

    fn expected(&self, expected: Expected) -> SnippetError {
        if self.source.is_eof() {
            return self.error(ParseErrorKind::UnexpectedEndOfInput);
        }
        self.error(ParseErrorKind::Expected(expected))
    }

    fn error(&self, kind: ParseErrorKind) -> SnippetError {
        ParseError::new(kind, self.source.location()).into()
    }
}
