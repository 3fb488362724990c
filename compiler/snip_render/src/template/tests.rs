use super::*;
use crate::indent::LineSeparator;
use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;
use snip_parse::SnippetEvent;

fn vars(pairs: &[(&str, &str)]) -> FxHashMap<String, String> {
    pairs
        .iter()
        .map(|&(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
}

fn seg(kind: SegmentKind, range: Range<usize>) -> TemplateSegment {
    TemplateSegment::new(kind, range)
}

#[test]
fn offset_tracks_content() {
    let mut renderer = TemplateRenderer::new();
    assert_eq!(renderer.current_offset(), 0);
    renderer.text("héllo ");
    assert_eq!(renderer.content(), "héllo ");
    assert_eq!(renderer.current_offset(), 7);
    renderer.tabstop(1);
    assert_eq!(renderer.current_offset(), 7);
}

#[test]
fn replayed_events_render() {
    let events = [
        SnippetEvent::SnippetStart,
        SnippetEvent::text("let "),
        SnippetEvent::placeholder_start(1, "name", 1),
        SnippetEvent::PlaceholderEnd { level: 1 },
        SnippetEvent::text(" = "),
        SnippetEvent::choice(2, ["0", "1"]),
        SnippetEvent::text(";"),
        SnippetEvent::Tabstop { index: 0 },
        SnippetEvent::SnippetEnd,
    ];
    let mut renderer = TemplateRenderer::new();
    for event in &events {
        event.dispatch(&mut renderer);
    }
    let rendered = renderer.finish();
    assert_eq!(rendered.content, "let name = 0;");
    assert_eq!(
        rendered.segments,
        vec![
            seg(SegmentKind::Placeholder { index: 1, level: 1 }, 4..8),
            seg(
                SegmentKind::Choice {
                    index: 2,
                    options: vec!["0".to_owned(), "1".to_owned()],
                },
                11..12
            ),
            seg(SegmentKind::Tabstop { index: 0 }, 13..13),
        ]
    );
}

#[test]
fn empty_choice_appends_nothing() {
    let rendered = render("a${1||}b", NoVariables, None).unwrap();
    assert_eq!(rendered.content, "ab");
    assert_eq!(rendered.segments[0].range, 1..1);
}

#[test]
fn named_choice_inserts_its_name() {
    // Indexed choices insert their first option, named choices their name.
    let rendered = render("${1|struct,enum|} ${kind|struct,enum|}", NoVariables, None).unwrap();
    assert_eq!(rendered.content, "struct kind");
    assert_eq!(
        rendered.segments[1],
        seg(
            SegmentKind::NamedChoice {
                name: "kind".to_owned(),
                options: vec!["struct".to_owned(), "enum".to_owned()],
            },
            7..11
        )
    );
}

#[test]
fn resolved_variables_leave_no_segment() {
    let rendered = render("// ${TM_FILENAME}", vars(&[("TM_FILENAME", "lib.rs")]), None).unwrap();
    assert_eq!(rendered.content, "// lib.rs");
    assert!(rendered.segments.is_empty());
}

#[test]
fn repeated_unresolved_variables_are_linked() {
    let rendered = render("$NAME = ${NAME} + $OTHER", NoVariables, None).unwrap();
    assert_eq!(rendered.content, "NAME = NAME + OTHER");
    let links: Vec<_> = rendered
        .segments
        .iter()
        .map(|s| match &s.kind {
            SegmentKind::Variable { name, linked } => (name.as_str(), *linked, s.range.clone()),
            other => panic!("unexpected segment {other:?}"),
        })
        .collect();
    assert_eq!(
        links,
        vec![("NAME", false, 0..4), ("NAME", true, 7..11), ("OTHER", false, 14..19)]
    );
}

#[test]
fn placeholder_range_covers_body() {
    let rendered = render("(${1:a${2:b}c})", NoVariables, None).unwrap();
    assert_eq!(rendered.content, "(abc)");
    assert_eq!(
        rendered.segments,
        vec![
            seg(SegmentKind::Placeholder { index: 1, level: 1 }, 1..4),
            seg(SegmentKind::Placeholder { index: 2, level: 2 }, 2..3),
        ]
    );
}

#[test]
fn placeholder_body_variable_resolves() {
    let rendered = render(
        "class ${1:$TM_FILENAME_BASE} {}",
        vars(&[("TM_FILENAME_BASE", "Main")]),
        None,
    )
    .unwrap();
    assert_eq!(rendered.content, "class Main {}");
    assert_eq!(rendered.segments[0].range, 6..10);
}

#[test]
fn indent_applies_to_text_and_placeholder_names() {
    let indent = IndentOptions::new(2, true, Some(LineSeparator::CrLf));
    let rendered = render("{\n\t${1:a\tb}\n}", NoVariables, Some(indent)).unwrap();
    assert_eq!(rendered.content, "{\r\n  a  b\r\n}");
    assert_eq!(rendered.segments[0].range, 5..9);
}

#[test]
fn indent_skips_variable_values_and_options() {
    let indent = IndentOptions::new(2, true, None);
    let rendered = render("$V ${1|\t,x|}", vars(&[("V", "a\tb")]), Some(indent)).unwrap();
    assert_eq!(rendered.content, "a\tb \t");
}

#[test]
fn tab_stops_in_navigation_order() {
    let rendered = render("$0 ${3:c} $1 ${2|x|} $1 $NAME", NoVariables, None).unwrap();
    assert_eq!(rendered.tab_stops(), vec![1, 2, 3, 0]);
    assert_eq!(rendered.offset_of(3), Some(1));
    assert_eq!(rendered.offset_of(0), Some(0));
    assert_eq!(rendered.offset_of(7), None);
}

#[test]
fn unmatched_end_is_ignored() {
    let mut renderer = TemplateRenderer::new();
    renderer.end_placeholder(1);
    renderer.text("x");
    assert_eq!(renderer.finish().content, "x");
}

#[test]
fn parse_errors_propagate() {
    let err = render("${1:", NoVariables, None).unwrap_err();
    assert_eq!(err.offset(), 4);
}
