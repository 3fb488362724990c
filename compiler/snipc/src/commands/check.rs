//! The `check` command: validate a snippet without rendering it.

use std::io::{Read, Write};

use snip_parse::SnippetHandler;
use tracing::debug;

use super::{parse_input, CliOptions, CommandError};

/// Handler that only counts what the parser reports.
#[derive(Debug, Default)]
struct Validator {
    tab_stops: usize,
    variables: usize,
}

impl SnippetHandler for Validator {
    fn text(&mut self, _text: &str) {}

    fn tabstop(&mut self, _index: u32) {
        self.tab_stops += 1;
    }

    fn choice(&mut self, _index: u32, _options: &[String]) {
        self.tab_stops += 1;
    }

    fn named_choice(&mut self, _name: &str, _options: &[String]) {}

    fn start_placeholder(&mut self, _index: u32, _name: &str, _level: u32) {
        self.tab_stops += 1;
    }

    fn end_placeholder(&mut self, _level: u32) {}

    fn variable(&mut self, _name: &str) {
        self.variables += 1;
    }
}

/// Validate the snippet. Prints a one-line summary on success; the first
/// grammar error is returned as `path:line:column: message`.
pub fn check<R: Read, W: Write>(
    input: R,
    options: &CliOptions,
    out: &mut W,
) -> Result<(), CommandError> {
    let validator = parse_input(input, options, Validator::default())?;
    debug!(?validator, "valid snippet");
    writeln!(
        out,
        "{}: ok ({} tab stops, {} variables)",
        options.input_name(),
        validator.tab_stops,
        validator.variables
    )?;
    Ok(())
}
