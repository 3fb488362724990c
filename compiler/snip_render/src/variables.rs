//! Variable resolution.
//!
//! A [`VariableResolver`] maps a snippet variable name to its value. The
//! renderer asks once per occurrence and falls back to the bare name when
//! the resolver returns `None`.

use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;
use std::path::PathBuf;

/// Lookup of snippet variable values.
///
/// Implemented for closures, string maps, [`EditorContext`] and
/// [`NoVariables`]. Resolvers run synchronously and must not fail; a
/// panicking resolver unwinds through the parse.
pub trait VariableResolver {
    fn resolve(&self, name: &str) -> Option<String>;
}

impl<F> VariableResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, name: &str) -> Option<String> {
        self(name)
    }
}

impl<S: BuildHasher> VariableResolver for HashMap<String, String, S> {
    fn resolve(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Resolver that knows no variables.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NoVariables;

impl VariableResolver for NoVariables {
    fn resolve(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Variables every editor context can provide.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WellKnownVariable {
    /// `TM_SELECTED_TEXT`
    SelectedText,
    /// `TM_CURRENT_LINE`
    CurrentLine,
    /// `TM_CURRENT_WORD`
    CurrentWord,
    /// `TM_LINE_INDEX`, zero-based.
    LineIndex,
    /// `TM_LINE_NUMBER`, one-based.
    LineNumber,
    /// `TM_FILENAME`
    FileName,
    /// `TM_FILENAME_BASE`, the file name without its extension.
    FileNameBase,
    /// `TM_DIRECTORY`
    Directory,
    /// `TM_FILEPATH`
    FilePath,
}

impl WellKnownVariable {
    pub const ALL: [WellKnownVariable; 9] = [
        WellKnownVariable::SelectedText,
        WellKnownVariable::CurrentLine,
        WellKnownVariable::CurrentWord,
        WellKnownVariable::LineIndex,
        WellKnownVariable::LineNumber,
        WellKnownVariable::FileName,
        WellKnownVariable::FileNameBase,
        WellKnownVariable::Directory,
        WellKnownVariable::FilePath,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WellKnownVariable::SelectedText => "TM_SELECTED_TEXT",
            WellKnownVariable::CurrentLine => "TM_CURRENT_LINE",
            WellKnownVariable::CurrentWord => "TM_CURRENT_WORD",
            WellKnownVariable::LineIndex => "TM_LINE_INDEX",
            WellKnownVariable::LineNumber => "TM_LINE_NUMBER",
            WellKnownVariable::FileName => "TM_FILENAME",
            WellKnownVariable::FileNameBase => "TM_FILENAME_BASE",
            WellKnownVariable::Directory => "TM_DIRECTORY",
            WellKnownVariable::FilePath => "TM_FILEPATH",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|var| var.name() == name)
    }
}

impl fmt::Display for WellKnownVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Editor state at the insertion point.
///
/// Resolves the [`WellKnownVariable`]s. Fields left `None` resolve to
/// `None`, except the current word which resolves to an empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditorContext {
    pub file_path: Option<PathBuf>,
    /// Zero-based line of the insertion point.
    pub line_index: Option<u32>,
    pub current_line: Option<String>,
    pub selected_text: Option<String>,
    pub current_word: Option<String>,
}

impl EditorContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_line_index(mut self, index: u32) -> Self {
        self.line_index = Some(index);
        self
    }

    #[must_use]
    pub fn with_current_line(mut self, line: impl Into<String>) -> Self {
        self.current_line = Some(line.into());
        self
    }

    #[must_use]
    pub fn with_selected_text(mut self, text: impl Into<String>) -> Self {
        self.selected_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_current_word(mut self, word: impl Into<String>) -> Self {
        self.current_word = Some(word.into());
        self
    }

    pub fn resolve_well_known(&self, variable: WellKnownVariable) -> Option<String> {
        match variable {
            WellKnownVariable::SelectedText => self.selected_text.clone(),
            WellKnownVariable::CurrentLine => self.current_line.clone(),
            WellKnownVariable::CurrentWord => {
                Some(self.current_word.clone().unwrap_or_default())
            }
            WellKnownVariable::LineIndex => self.line_index.map(|index| index.to_string()),
            WellKnownVariable::LineNumber => {
                self.line_index.map(|index| (u64::from(index) + 1).to_string())
            }
            WellKnownVariable::FileName => {
                let path = self.file_path.as_ref()?;
                Some(path.file_name()?.to_string_lossy().into_owned())
            }
            WellKnownVariable::FileNameBase => {
                let path = self.file_path.as_ref()?;
                Some(
                    path.file_stem()
                        .map(|stem| stem.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                )
            }
            WellKnownVariable::Directory => {
                let path = self.file_path.as_ref()?;
                Some(path.parent()?.display().to_string())
            }
            WellKnownVariable::FilePath => {
                self.file_path.as_ref().map(|path| path.display().to_string())
            }
        }
    }
}

impl VariableResolver for EditorContext {
    fn resolve(&self, name: &str) -> Option<String> {
        self.resolve_well_known(WellKnownVariable::from_name(name)?)
    }
}
