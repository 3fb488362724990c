use super::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_owned()).collect()
}

fn run(command: Command, source: &str, options: &CliOptions) -> Result<String, CommandError> {
    let mut out = Vec::new();
    let input = source.as_bytes();
    match command {
        Command::Events => events(input, options, &mut out)?,
        Command::Render => render(input, options, &mut out)?,
        Command::Check => check(input, options, &mut out)?,
    }
    Ok(String::from_utf8(out).unwrap())
}

// === Argument parsing ===

#[test]
fn defaults() {
    let options = parse_options(&[]).unwrap();
    assert_eq!(options.input, None);
    assert_eq!(options.input_name(), STDIN_NAME);
    assert_eq!(options.tab_size, 4);
    assert!(!options.use_tabs);
    assert!(!options.json);
    assert_eq!(options.buffer_size, None);
}

#[test]
fn all_flags() {
    let options = parse_options(&args(&[
        "--json",
        "--tab-size=2",
        "--use-tabs",
        "--eol=crlf",
        "--var=USER=ada",
        "--var=EXPR=a=b",
        "--file=src/main.rs",
        "--line=3",
        "--selection=x",
        "--word=main",
        "--current-line=fn main() {}",
        "--buffer-size=16",
        "snippet.txt",
    ]))
    .unwrap();
    assert!(options.json);
    assert_eq!(options.tab_size, 2);
    assert!(options.use_tabs);
    assert_eq!(options.eol, Some(LineSeparator::CrLf));
    assert_eq!(options.variables.get("USER").map(String::as_str), Some("ada"));
    assert_eq!(options.variables.get("EXPR").map(String::as_str), Some("a=b"));
    assert_eq!(options.context.file_path, Some(PathBuf::from("src/main.rs")));
    assert_eq!(options.context.line_index, Some(2));
    assert_eq!(options.context.selected_text.as_deref(), Some("x"));
    assert_eq!(options.context.current_word.as_deref(), Some("main"));
    assert_eq!(options.context.current_line.as_deref(), Some("fn main() {}"));
    assert_eq!(options.buffer_size, NonZeroUsize::new(16));
    assert_eq!(options.input_name(), "snippet.txt");
}

#[test]
fn dash_means_stdin() {
    let options = parse_options(&args(&["-"])).unwrap();
    assert_eq!(options.input.as_deref(), Some("-"));
    assert_eq!(options.input_name(), STDIN_NAME);
}

#[test]
fn bad_arguments_are_usage_errors() {
    let cases = [
        vec!["--nope"],
        vec!["-x"],
        vec!["--tab-size=four"],
        vec!["--eol=nel"],
        vec!["--var=NOVALUE"],
        vec!["--line=0"],
        vec!["--buffer-size=0"],
        vec!["a.txt", "b.txt"],
    ];
    for case in cases {
        let err = parse_options(&args(&case)).unwrap_err();
        assert!(matches!(err, CommandError::Usage(_)), "{case:?}: {err:?}");
    }
}

#[test]
fn command_names() {
    assert_eq!(Command::from_name("events"), Some(Command::Events));
    assert_eq!(Command::from_name("render"), Some(Command::Render));
    assert_eq!(Command::from_name("check"), Some(Command::Check));
    assert_eq!(Command::from_name("fmt"), None);
}

// === Commands ===

#[test]
fn events_as_text() {
    let out = run(Command::Events, "hello ${1:world}", &CliOptions::default()).unwrap();
    assert_eq!(
        out,
        "snippet-start\n\
         text \"hello \"\n\
         placeholder-start 1 \"world\" level=1\n\
         placeholder-end level=1\n\
         snippet-end\n"
    );
}

#[test]
fn events_as_json_lines() {
    let options = CliOptions {
        json: true,
        ..CliOptions::default()
    };
    let out = run(Command::Events, "a$1", &options).unwrap();
    assert_eq!(
        out,
        "{\"event\":\"snippet_start\"}\n\
         {\"event\":\"text\",\"text\":\"a\"}\n\
         {\"event\":\"tabstop\",\"index\":1}\n\
         {\"event\":\"snippet_end\"}\n"
    );
}

#[test]
fn render_with_variables_and_context() {
    let options = parse_options(&args(&[
        "--var=AUTHOR=ada",
        "--file=/src/Main.java",
        "--line=10",
    ]))
    .unwrap();
    let out = run(
        Command::Render,
        "// ${AUTHOR}, ${TM_FILENAME_BASE}:$TM_LINE_NUMBER $UNKNOWN",
        &options,
    )
    .unwrap();
    assert_eq!(out, "// ada, Main:10 UNKNOWN");
}

#[test]
fn var_flag_overrides_context() {
    let options = parse_options(&args(&["--file=a.rs", "--var=TM_FILENAME=b.rs"])).unwrap();
    assert_eq!(options.resolve_variable("TM_FILENAME").as_deref(), Some("b.rs"));
}

#[test]
fn render_applies_indent_options() {
    let options = parse_options(&args(&["--tab-size=2", "--eol=crlf"])).unwrap();
    let out = run(Command::Render, "{\n\t$0\n}", &options).unwrap();
    assert_eq!(out, "{\r\n  \r\n}");

    let options = parse_options(&args(&["--use-tabs"])).unwrap();
    let out = run(Command::Render, "{\n\t$0\n}", &options).unwrap();
    assert_eq!(out, "{\n\t\n}");
}

#[test]
fn render_json_lists_segments() {
    let options = CliOptions {
        json: true,
        ..CliOptions::default()
    };
    let out = run(Command::Render, "${1:x} $0", &options).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["content"], "x ");
    assert_eq!(value["tab_stops"], serde_json::json!([1, 0]));
    assert_eq!(value["segments"][0]["kind"], "placeholder");
    assert_eq!(value["segments"][0]["range"], serde_json::json!([0, 1]));
    assert_eq!(value["segments"][1]["kind"], "tabstop");
}

#[test]
fn check_reports_summary() {
    let out = run(
        Command::Check,
        "${1:a} ${2|x,y|} $0 $NAME",
        &CliOptions::default(),
    )
    .unwrap();
    assert_eq!(out, "<stdin>: ok (3 tab stops, 1 variables)\n");
}

#[test]
fn check_reports_location() {
    let options = parse_options(&args(&["snippet.txt"])).unwrap();
    let err = run(Command::Check, "ok\n${1:", &options).unwrap_err();
    assert_eq!(err.to_string(), "snippet.txt:2:5: Unexpected end of input");
}

#[test]
fn small_buffer_gives_same_output() {
    let source = "for ${1:i} in ${2:0..n} {\n\t$0\n}";
    let baseline = run(Command::Events, source, &CliOptions::default()).unwrap();
    let options = parse_options(&args(&["--buffer-size=1"])).unwrap();
    assert_eq!(run(Command::Events, source, &options).unwrap(), baseline);
}

#[test]
fn missing_file_is_an_open_error() {
    let options = parse_options(&args(&["/definitely/not/here.snippet"])).unwrap();
    let err = execute(Command::Check, &options, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, CommandError::Open { .. }));
    assert!(err.to_string().starts_with("cannot read '/definitely/not/here.snippet'"));
}
