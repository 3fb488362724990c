//! The `render` command: print the flattened template.

use std::io::{Read, Write};

use snip_render::{RenderedTemplate, SegmentKind, TemplateRenderer, TemplateSegment};

use super::{parse_input, CliOptions, CommandError};

/// Render the snippet with the configured variables and indentation.
///
/// Plain output is the content alone. `--json` adds the tab stops and the
/// editable segments.
pub fn render<R: Read, W: Write>(
    input: R,
    options: &CliOptions,
    out: &mut W,
) -> Result<(), CommandError> {
    let resolver = |name: &str| options.resolve_variable(name);
    let renderer = TemplateRenderer::with_resolver(resolver)
        .with_indent(Some(options.indent_options()));
    let rendered = parse_input(input, options, renderer)?.finish();

    if options.json {
        serde_json::to_writer_pretty(&mut *out, &to_json(&rendered))?;
        writeln!(out)?;
    } else {
        out.write_all(rendered.content.as_bytes())?;
    }
    Ok(())
}

fn to_json(rendered: &RenderedTemplate) -> serde_json::Value {
    serde_json::json!({
        "content": rendered.content,
        "tab_stops": rendered.tab_stops(),
        "segments": rendered.segments.iter().map(segment_json).collect::<Vec<_>>(),
    })
}

fn segment_json(segment: &TemplateSegment) -> serde_json::Value {
    let range = [segment.range.start, segment.range.end];
    match &segment.kind {
        SegmentKind::Tabstop { index } => {
            serde_json::json!({ "kind": "tabstop", "index": index, "range": range })
        }
        SegmentKind::Placeholder { index, level } => serde_json::json!({
            "kind": "placeholder", "index": index, "level": level, "range": range,
        }),
        SegmentKind::Choice { index, options } => serde_json::json!({
            "kind": "choice", "index": index, "options": options, "range": range,
        }),
        SegmentKind::NamedChoice { name, options } => serde_json::json!({
            "kind": "named_choice", "name": name, "options": options, "range": range,
        }),
        SegmentKind::Variable { name, linked } => serde_json::json!({
            "kind": "variable", "name": name, "linked": linked, "range": range,
        }),
    }
}
