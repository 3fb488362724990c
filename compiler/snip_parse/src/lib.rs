//! Streaming parser for LSP snippet syntax.
//!
//! The parser pulls one byte at a time from a [`SourceWindow`] and reports
//! the structure it recognises to a [`SnippetHandler`] as it goes. No syntax
//! tree is built; a handler that wants one can assemble it from the
//! callbacks.
//!
//! # Grammar
//!
//! ```text
//! any         ::= tabstop | placeholder | choice | variable | text
//! tabstop     ::= '$' int | '${' int '}'
//! placeholder ::= '${' int ':' any '}'
//! choice      ::= '${' int '|' text (',' text)* '|}'
//! variable    ::= '$' var | '${' var '}' | '${' var ':' any '}'
//! var         ::= [_a-zA-Z] [_a-zA-Z0-9]*
//! int         ::= [0-9]+
//! text        ::= any run of characters not starting a '$' construct
//! ```
//!
//! # Modules
//!
//! - [`handler`]: the callback contract
//! - [`event`]: owned events and a recording handler
//! - [`parser`]: the recursive-descent parser
//! - [`error`]: grammar and source errors
//!
//! [`SourceWindow`]: snip_source::SourceWindow

pub mod error;
pub mod event;
pub mod handler;
pub mod parser;
mod stack;

pub use error::{Expected, ParseError, ParseErrorKind, SnippetError};
pub use event::{EventCollector, SnippetEvent};
pub use handler::SnippetHandler;
pub use parser::{ParserConfig, SnippetParser};
pub use snip_source::{Location, SourceError, DEFAULT_BUFFER_SIZE, MIN_BUFFER_SIZE};

/// Parse `source` and report its structure to `handler`.
///
/// Shorthand for [`SnippetParser::new`] followed by
/// [`parse_str`](SnippetParser::parse_str).
pub fn parse<H: SnippetHandler>(source: &str, handler: H) -> Result<H, SnippetError> {
    let mut parser = SnippetParser::new(handler);
    parser.parse_str(source)?;
    Ok(parser.into_handler())
}

/// Parse `source` into its list of events.
pub fn collect_events(source: &str) -> Result<Vec<SnippetEvent>, SnippetError> {
    parse(source, EventCollector::new()).map(EventCollector::into_events)
}
