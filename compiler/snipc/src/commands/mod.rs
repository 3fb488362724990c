//! Command handlers for the snippet CLI.
//!
//! Each submodule implements one command. Argument parsing, input opening
//! and error reporting are shared and live here in the module root.

use std::fs::File;
use std::io::{self, Read, Write};
use std::num::NonZeroUsize;

use rustc_hash::FxHashMap;
use snip_parse::{ParserConfig, SnippetError, SnippetHandler, SnippetParser};
use snip_render::{EditorContext, IndentOptions, LineSeparator, VariableResolver};
use tracing::debug;

mod check;
mod events;
mod render;

pub use check::check;
pub use events::events;
pub use render::render;

/// Display name used for standard input in diagnostics.
pub const STDIN_NAME: &str = "<stdin>";

const DEFAULT_TAB_SIZE: usize = 4;

/// A CLI subcommand.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the event stream.
    Events,
    /// Print the rendered template.
    Render,
    /// Validate only.
    Check,
}

impl Command {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "events" => Some(Command::Events),
            "render" => Some(Command::Render),
            "check" => Some(Command::Check),
            _ => None,
        }
    }
}

/// Failure of a CLI command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    Usage(String),

    #[error("cannot read '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{}", diagnostic(.path, .source))]
    Snippet {
        path: String,
        #[source]
        source: SnippetError,
    },

    #[error(transparent)]
    Write(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// `path:line:column: message` for grammar errors, `path: message` for
/// read failures.
fn diagnostic(path: &str, err: &SnippetError) -> String {
    match err.as_parse_error() {
        Some(parse) => format!(
            "{path}:{}:{}: {}",
            parse.line(),
            parse.column(),
            parse.message()
        ),
        None => format!("{path}: {err}"),
    }
}

/// Options shared by all commands.
#[derive(Clone, Debug)]
pub struct CliOptions {
    /// Input file; `None` or `-` reads standard input.
    pub input: Option<String>,
    pub json: bool,
    pub tab_size: usize,
    pub use_tabs: bool,
    pub eol: Option<LineSeparator>,
    /// `--var` values, consulted before the editor context.
    pub variables: FxHashMap<String, String>,
    pub context: EditorContext,
    pub buffer_size: Option<NonZeroUsize>,
}

impl Default for CliOptions {
    fn default() -> Self {
        CliOptions {
            input: None,
            json: false,
            tab_size: DEFAULT_TAB_SIZE,
            use_tabs: false,
            eol: None,
            variables: FxHashMap::default(),
            context: EditorContext::default(),
            buffer_size: None,
        }
    }
}

impl CliOptions {
    /// Name of the input for diagnostics.
    pub fn input_name(&self) -> &str {
        match self.input.as_deref() {
            None | Some("-") => STDIN_NAME,
            Some(path) => path,
        }
    }

    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            buffer_size: self.buffer_size,
        }
    }

    pub fn indent_options(&self) -> IndentOptions {
        IndentOptions::new(self.tab_size, !self.use_tabs, self.eol.clone())
    }

    /// Resolve `name` from `--var` values first, then from the editor context.
    pub fn resolve_variable(&self, name: &str) -> Option<String> {
        self.variables
            .get(name)
            .cloned()
            .or_else(|| self.context.resolve(name))
    }
}

/// Parse the arguments that follow the command name.
pub fn parse_options(args: &[String]) -> Result<CliOptions, CommandError> {
    let mut options = CliOptions::default();
    for arg in args {
        match arg.as_str() {
            "--json" => options.json = true,
            "--use-tabs" => options.use_tabs = true,
            "-" => set_input(&mut options, arg)?,
            arg if arg.starts_with("--") => parse_flag(&mut options, arg)?,
            arg if arg.starts_with('-') => {
                return Err(CommandError::Usage(format!("unknown option: {arg}")));
            }
            _ => set_input(&mut options, arg)?,
        }
    }
    Ok(options)
}

fn parse_flag(options: &mut CliOptions, arg: &str) -> Result<(), CommandError> {
    let Some((flag, value)) = arg.split_once('=') else {
        return Err(CommandError::Usage(format!("unknown option: {arg}")));
    };
    match flag {
        "--tab-size" => options.tab_size = parse_number(flag, value)?,
        "--eol" => {
            let eol = LineSeparator::from_name(value).ok_or_else(|| {
                CommandError::Usage(format!("--eol expects lf, crlf or cr, got '{value}'"))
            })?;
            options.eol = Some(eol);
        }
        "--var" => {
            let Some((name, value)) = value.split_once('=') else {
                return Err(CommandError::Usage(format!(
                    "--var expects NAME=VALUE, got '{value}'"
                )));
            };
            options.variables.insert(name.to_owned(), value.to_owned());
        }
        "--file" => options.context.file_path = Some(value.into()),
        "--line" => {
            // One-based on the command line, zero-based in the context.
            let line: u32 = parse_number(flag, value)?;
            let index = line
                .checked_sub(1)
                .ok_or_else(|| CommandError::Usage("--line starts at 1".to_owned()))?;
            options.context.line_index = Some(index);
        }
        "--selection" => options.context.selected_text = Some(value.to_owned()),
        "--word" => options.context.current_word = Some(value.to_owned()),
        "--current-line" => options.context.current_line = Some(value.to_owned()),
        "--buffer-size" => {
            let size: usize = parse_number(flag, value)?;
            let size = NonZeroUsize::new(size).ok_or_else(|| {
                CommandError::Usage("--buffer-size must be at least 1".to_owned())
            })?;
            options.buffer_size = Some(size);
        }
        _ => return Err(CommandError::Usage(format!("unknown option: {flag}"))),
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::Usage(format!("{flag} expects a number, got '{value}'")))
}

fn set_input(options: &mut CliOptions, path: &str) -> Result<(), CommandError> {
    if let Some(existing) = &options.input {
        return Err(CommandError::Usage(format!(
            "only one input allowed, got '{existing}' and '{path}'"
        )));
    }
    options.input = Some(path.to_owned());
    Ok(())
}

/// Open the configured input: a file, or standard input for `-` or none.
pub fn open_input(options: &CliOptions) -> Result<Box<dyn Read>, CommandError> {
    match options.input.as_deref() {
        None | Some("-") => Ok(Box::new(io::stdin().lock())),
        Some(path) => {
            let file = File::open(path).map_err(|source| CommandError::Open {
                path: path.to_owned(),
                source,
            })?;
            Ok(Box::new(file))
        }
    }
}

/// Run `command` on the configured input, writing results to `out`.
pub fn execute<W: Write>(
    command: Command,
    options: &CliOptions,
    out: &mut W,
) -> Result<(), CommandError> {
    debug!(?command, input = options.input_name(), "execute");
    let input = open_input(options)?;
    match command {
        Command::Events => events(input, options, out),
        Command::Render => render(input, options, out),
        Command::Check => check(input, options, out),
    }
}

/// Parse `input` into `handler` with the configured window size.
///
/// Errors are tagged with the input name.
fn parse_input<R: Read, H: SnippetHandler>(
    input: R,
    options: &CliOptions,
    handler: H,
) -> Result<H, CommandError> {
    let mut parser = SnippetParser::with_config(handler, options.parser_config());
    parser
        .parse_reader(input)
        .map_err(|source| CommandError::Snippet {
            path: options.input_name().to_owned(),
            source,
        })?;
    Ok(parser.into_handler())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
