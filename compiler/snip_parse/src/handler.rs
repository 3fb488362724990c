//! The callback contract between the parser and its consumers.

/// Receives the structure of a snippet as the parser recognises it.
///
/// Calls arrive depth-first in source order, bracketed by
/// [`start_snippet`](Self::start_snippet) and
/// [`end_snippet`](Self::end_snippet). Every
/// [`start_placeholder`](Self::start_placeholder) is matched by exactly one
/// [`end_placeholder`](Self::end_placeholder) carrying the same level, and
/// everything reported between the two belongs to that placeholder's body.
///
/// If parsing fails, whatever the handler accumulated is incomplete and
/// should be discarded.
pub trait SnippetHandler {
    /// Parsing has started.
    fn start_snippet(&mut self) {}

    /// The whole input has been consumed.
    fn end_snippet(&mut self) {}

    /// A run of literal text.
    fn text(&mut self, text: &str);

    /// `$n` or `${n}`.
    fn tabstop(&mut self, index: u32);

    /// `${n|one,two|}`.
    fn choice(&mut self, index: u32, options: &[String]);

    /// `${name|one,two|}`.
    fn named_choice(&mut self, name: &str, options: &[String]);

    /// `${n:name...`: the placeholder opens with its default text `name`.
    ///
    /// `level` is the nesting depth of this placeholder, starting at 1.
    fn start_placeholder(&mut self, index: u32, name: &str, level: u32);

    /// The placeholder opened at `level` is closed.
    fn end_placeholder(&mut self, level: u32);

    /// `$name` or `${name}`.
    fn variable(&mut self, name: &str);
}

impl<H: SnippetHandler + ?Sized> SnippetHandler for &mut H {
    fn start_snippet(&mut self) {
        (**self).start_snippet();
    }

    fn end_snippet(&mut self) {
        (**self).end_snippet();
    }

    fn text(&mut self, text: &str) {
        (**self).text(text);
    }

    fn tabstop(&mut self, index: u32) {
        (**self).tabstop(index);
    }

    fn choice(&mut self, index: u32, options: &[String]) {
        (**self).choice(index, options);
    }

    fn named_choice(&mut self, name: &str, options: &[String]) {
        (**self).named_choice(name, options);
    }

    fn start_placeholder(&mut self, index: u32, name: &str, level: u32) {
        (**self).start_placeholder(index, name, level);
    }

    fn end_placeholder(&mut self, level: u32) {
        (**self).end_placeholder(level);
    }

    fn variable(&mut self, name: &str) {
        (**self).variable(name);
    }
}
