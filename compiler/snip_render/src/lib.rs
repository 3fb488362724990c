//! Snippet rendering.
//!
//! Turns the event stream produced by [`snip_parse`] into template text:
//!
//! ```text
//! "hello ${1:world} $TM_FILENAME"
//!        │
//!        ▼  SnippetParser
//! text / placeholder / variable events
//!        │
//!        ▼  TemplateRenderer + VariableResolver + IndentOptions
//! "hello world Main.rs"  + segments [Placeholder 1 @ 6..11]
//! ```
//!
//! # Modules
//!
//! - [`indent`]: tab and line-separator normalization for inserted text
//! - [`variables`]: variable lookup, including the well-known `TM_*` names
//! - [`template`]: the rendering handler and its output

pub mod indent;
pub mod template;
pub mod variables;

pub use indent::{format_text, should_be_formatted, IndentOptions, LineSeparator};
pub use template::{render, RenderedTemplate, SegmentKind, TemplateRenderer, TemplateSegment};
pub use variables::{EditorContext, NoVariables, VariableResolver, WellKnownVariable};
