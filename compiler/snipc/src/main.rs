//! Snippet CLI
//!
//! Parses LSP snippets and prints their events or rendered text.

use std::io::Write;

use snipc::commands::{execute, parse_options, Command};

fn main() {
    snipc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let name = args[1].as_str();
    if matches!(name, "help" | "--help" | "-h") {
        print_usage();
        return;
    }

    let Some(command) = Command::from_name(name) else {
        eprintln!("Unknown command: {name}");
        eprintln!();
        print_usage();
        std::process::exit(1);
    };

    let options = match parse_options(&args[2..]) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!("Run 'snipc help' for usage");
            std::process::exit(1);
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = execute(command, &options, &mut out);
    let _ = out.flush();

    if let Err(err) = result {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage: snipc <command> [options] [FILE|-]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  events    Print the parsed event stream, one event per line");
    eprintln!("  render    Print the rendered template");
    eprintln!("  check     Validate the snippet and report the first error");
    eprintln!();
    eprintln!("Input is read from FILE, or from stdin when FILE is '-' or omitted.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --json                 JSON output (events, render)");
    eprintln!("  --tab-size=<n>         Spaces per tab when indenting with spaces (default: 4)");
    eprintln!("  --use-tabs             Keep tabs instead of expanding them");
    eprintln!("  --eol=<lf|crlf|cr>     Line separator for inserted newlines");
    eprintln!("  --var=<NAME>=<VALUE>   Value for a snippet variable (repeatable)");
    eprintln!("  --file=<path>          Editor file, for TM_FILENAME and friends");
    eprintln!("  --line=<n>             Editor line number, 1-based");
    eprintln!("  --current-line=<text>  Text of the editor line, for TM_CURRENT_LINE");
    eprintln!("  --word=<text>          Word under the cursor, for TM_CURRENT_WORD");
    eprintln!("  --selection=<text>     Selected text, for TM_SELECTED_TEXT");
    eprintln!("  --buffer-size=<n>      Parser read window in bytes (default: 1024)");
    eprintln!();
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=snip_parse=trace) to enable logging.");
}
