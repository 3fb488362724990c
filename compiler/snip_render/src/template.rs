//! Flattening snippet events into template text.
//!
//! [`TemplateRenderer`] is the default [`SnippetHandler`]. It appends the
//! text each event contributes to one output string and, next to it,
//! records the editable regions ([`TemplateSegment`]) a live-template
//! engine needs to drive tab navigation.
//!
//! What each event contributes:
//!
//! | event              | appended                           |
//! |--------------------|------------------------------------|
//! | text               | the text, indent-formatted         |
//! | tabstop            | nothing                            |
//! | choice (indexed)   | the first option, or nothing       |
//! | choice (named)     | the name; options are ignored      |
//! | placeholder start  | the name, indent-formatted         |
//! | variable           | the resolved value, else the name  |

use std::ops::Range;

use rustc_hash::FxHashSet;
use snip_parse::{SnippetError, SnippetHandler, SnippetParser};
use tracing::{debug, trace};

use crate::indent::{format_text, IndentOptions};
use crate::variables::{NoVariables, VariableResolver};

/// What an editable region of the output is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    Tabstop { index: u32 },
    /// The range covers the name and the whole body.
    Placeholder { index: u32, level: u32 },
    Choice { index: u32, options: Vec<String> },
    NamedChoice { name: String, options: Vec<String> },
    /// An unresolved variable. `linked` marks a repeat of a name seen
    /// earlier in the same template, which mirrors the first occurrence.
    Variable { name: String, linked: bool },
}

impl SegmentKind {
    /// The tab stop this region belongs to, if it is numbered.
    pub fn index(&self) -> Option<u32> {
        match self {
            SegmentKind::Tabstop { index }
            | SegmentKind::Placeholder { index, .. }
            | SegmentKind::Choice { index, .. } => Some(*index),
            SegmentKind::NamedChoice { .. } | SegmentKind::Variable { .. } => None,
        }
    }
}

/// An editable region of rendered content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateSegment {
    pub kind: SegmentKind,
    /// Byte range inside [`RenderedTemplate::content`].
    pub range: Range<usize>,
}

impl TemplateSegment {
    pub fn new(kind: SegmentKind, range: Range<usize>) -> Self {
        TemplateSegment { kind, range }
    }
}

/// Output of a finished render.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedTemplate {
    pub content: String,
    /// Regions in source order; an enclosing placeholder precedes the
    /// regions inside it.
    pub segments: Vec<TemplateSegment>,
}

impl RenderedTemplate {
    /// Distinct tab stop indices in navigation order: ascending, with `0`
    /// (the final cursor position) last.
    pub fn tab_stops(&self) -> Vec<u32> {
        let mut stops: Vec<u32> = self.segments.iter().filter_map(|s| s.kind.index()).collect();
        stops.sort_unstable_by_key(|&index| (index == 0, index));
        stops.dedup();
        stops
    }

    /// Offset where the cursor lands for tab stop `index`.
    pub fn offset_of(&self, index: u32) -> Option<usize> {
        self.segments
            .iter()
            .find(|s| s.kind.index() == Some(index))
            .map(|s| s.range.start)
    }
}

/// Handler that renders snippet events into a [`RenderedTemplate`].
///
/// Content only grows. One renderer may receive several snippets in a row;
/// their output is concatenated and variable links carry across them.
#[derive(Debug)]
pub struct TemplateRenderer<V = NoVariables> {
    resolver: V,
    indent: Option<IndentOptions>,
    content: String,
    segments: Vec<TemplateSegment>,
    /// Indices into `segments` of the placeholders still open.
    open: Vec<usize>,
    unresolved: FxHashSet<String>,
}

impl TemplateRenderer<NoVariables> {
    pub fn new() -> Self {
        Self::with_resolver(NoVariables)
    }
}

impl Default for TemplateRenderer<NoVariables> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: VariableResolver> TemplateRenderer<V> {
    pub fn with_resolver(resolver: V) -> Self {
        TemplateRenderer {
            resolver,
            indent: None,
            content: String::new(),
            segments: Vec::new(),
            open: Vec::new(),
            unresolved: FxHashSet::default(),
        }
    }

    /// Format inserted text with `indent`. `None` inserts text as written.
    #[must_use]
    pub fn with_indent(mut self, indent: Option<IndentOptions>) -> Self {
        self.indent = indent;
        self
    }

    /// Content rendered so far.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Byte offset the next fragment will be written at.
    pub fn current_offset(&self) -> usize {
        self.content.len()
    }

    pub fn segments(&self) -> &[TemplateSegment] {
        &self.segments
    }

    pub fn finish(self) -> RenderedTemplate {
        RenderedTemplate {
            content: self.content,
            segments: self.segments,
        }
    }

    fn push_formatted(&mut self, text: &str) {
        let formatted = format_text(text, self.indent.as_ref());
        self.content.push_str(&formatted);
    }

    /// Record a region from `start` to the current offset.
    fn push_segment(&mut self, kind: SegmentKind, start: usize) {
        let end = self.current_offset();
        self.segments.push(TemplateSegment::new(kind, start..end));
    }
}

impl<V: VariableResolver> SnippetHandler for TemplateRenderer<V> {
    fn end_snippet(&mut self) {
        debug!(
            len = self.content.len(),
            segments = self.segments.len(),
            "rendered"
        );
    }

    fn text(&mut self, text: &str) {
        self.push_formatted(text);
    }

    fn tabstop(&mut self, index: u32) {
        self.push_segment(SegmentKind::Tabstop { index }, self.current_offset());
    }

    fn choice(&mut self, index: u32, options: &[String]) {
        let start = self.current_offset();
        if let Some(first) = options.first() {
            self.content.push_str(first);
        }
        self.push_segment(
            SegmentKind::Choice {
                index,
                options: options.to_vec(),
            },
            start,
        );
    }

    fn named_choice(&mut self, name: &str, options: &[String]) {
        // Unlike the indexed form, the name is inserted rather than the
        // first option.
        let start = self.current_offset();
        self.content.push_str(name);
        self.push_segment(
            SegmentKind::NamedChoice {
                name: name.to_owned(),
                options: options.to_vec(),
            },
            start,
        );
    }

    fn start_placeholder(&mut self, index: u32, name: &str, level: u32) {
        let start = self.current_offset();
        self.push_formatted(name);
        self.open.push(self.segments.len());
        self.segments.push(TemplateSegment::new(
            SegmentKind::Placeholder { index, level },
            start..start,
        ));
    }

    fn end_placeholder(&mut self, level: u32) {
        let end = self.current_offset();
        let Some(open) = self.open.pop() else {
            trace!(level, "placeholder end without start");
            return;
        };
        if let Some(segment) = self.segments.get_mut(open) {
            segment.range.end = end;
        }
    }

    fn variable(&mut self, name: &str) {
        if let Some(value) = self.resolver.resolve(name) {
            trace!(name, "resolved variable");
            self.content.push_str(&value);
            return;
        }
        let linked = !self.unresolved.insert(name.to_owned());
        trace!(name, linked, "unresolved variable");
        let start = self.current_offset();
        self.content.push_str(name);
        self.push_segment(
            SegmentKind::Variable {
                name: name.to_owned(),
                linked,
            },
            start,
        );
    }
}

/// Parse `snippet` and render it with `resolver` and `indent`.
pub fn render<V: VariableResolver>(
    snippet: &str,
    resolver: V,
    indent: Option<IndentOptions>,
) -> Result<RenderedTemplate, SnippetError> {
    let renderer = TemplateRenderer::with_resolver(resolver).with_indent(indent);
    let mut parser = SnippetParser::new(renderer);
    parser.parse_str(snippet)?;
    Ok(parser.into_handler().finish())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
