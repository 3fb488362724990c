//! The `events` command: print the parser's event stream.

use std::io::{Read, Write};

use snip_parse::EventCollector;

use super::{parse_input, CliOptions, CommandError};

/// Print one event per line, as text or (with `--json`) as JSON objects.
pub fn events<R: Read, W: Write>(
    input: R,
    options: &CliOptions,
    out: &mut W,
) -> Result<(), CommandError> {
    let collector = parse_input(input, options, EventCollector::new())?;
    for event in collector.events() {
        if options.json {
            serde_json::to_writer(&mut *out, event)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{event}")?;
        }
    }
    Ok(())
}
