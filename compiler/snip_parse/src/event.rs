//! Owned snippet events and a handler that records them.

use std::fmt;

use crate::SnippetHandler;

/// One structural callback, as an owned value.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "event", rename_all = "snake_case")
)]
pub enum SnippetEvent {
    SnippetStart,
    SnippetEnd,
    Text { text: String },
    Tabstop { index: u32 },
    Choice { index: u32, options: Vec<String> },
    NamedChoice { name: String, options: Vec<String> },
    PlaceholderStart { index: u32, name: String, level: u32 },
    PlaceholderEnd { level: u32 },
    Variable { name: String },
}

impl SnippetEvent {
    pub fn text(text: impl Into<String>) -> Self {
        SnippetEvent::Text { text: text.into() }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        SnippetEvent::Variable { name: name.into() }
    }

    pub fn placeholder_start(index: u32, name: impl Into<String>, level: u32) -> Self {
        SnippetEvent::PlaceholderStart {
            index,
            name: name.into(),
            level,
        }
    }

    pub fn choice<S: Into<String>>(index: u32, options: impl IntoIterator<Item = S>) -> Self {
        SnippetEvent::Choice {
            index,
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Replay this event into `handler`.
    pub fn dispatch<H: SnippetHandler + ?Sized>(&self, handler: &mut H) {
        match self {
            SnippetEvent::SnippetStart => handler.start_snippet(),
            SnippetEvent::SnippetEnd => handler.end_snippet(),
            SnippetEvent::Text { text } => handler.text(text),
            SnippetEvent::Tabstop { index } => handler.tabstop(*index),
            SnippetEvent::Choice { index, options } => handler.choice(*index, options),
            SnippetEvent::NamedChoice { name, options } => handler.named_choice(name, options),
            SnippetEvent::PlaceholderStart { index, name, level } => {
                handler.start_placeholder(*index, name, *level);
            }
            SnippetEvent::PlaceholderEnd { level } => handler.end_placeholder(*level),
            SnippetEvent::Variable { name } => handler.variable(name),
        }
    }
}

impl fmt::Display for SnippetEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnippetEvent::SnippetStart => f.write_str("snippet-start"),
            SnippetEvent::SnippetEnd => f.write_str("snippet-end"),
            SnippetEvent::Text { text } => write!(f, "text {text:?}"),
            SnippetEvent::Tabstop { index } => write!(f, "tabstop {index}"),
            SnippetEvent::Choice { index, options } => write!(f, "choice {index} {options:?}"),
            SnippetEvent::NamedChoice { name, options } => {
                write!(f, "choice {name:?} {options:?}")
            }
            SnippetEvent::PlaceholderStart { index, name, level } => {
                write!(f, "placeholder-start {index} {name:?} level={level}")
            }
            SnippetEvent::PlaceholderEnd { level } => write!(f, "placeholder-end level={level}"),
            SnippetEvent::Variable { name } => write!(f, "variable {name:?}"),
        }
    }
}

/// Handler that records every callback as a [`SnippetEvent`].
#[derive(Clone, Debug, Default)]
pub struct EventCollector {
    events: Vec<SnippetEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SnippetEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<SnippetEvent> {
        self.events
    }
}

impl SnippetHandler for EventCollector {
    fn start_snippet(&mut self) {
        self.events.push(SnippetEvent::SnippetStart);
    }

    fn end_snippet(&mut self) {
        self.events.push(SnippetEvent::SnippetEnd);
    }

    fn text(&mut self, text: &str) {
        self.events.push(SnippetEvent::text(text));
    }

    fn tabstop(&mut self, index: u32) {
        self.events.push(SnippetEvent::Tabstop { index });
    }

    fn choice(&mut self, index: u32, options: &[String]) {
        self.events.push(SnippetEvent::Choice {
            index,
            options: options.to_vec(),
        });
    }

    fn named_choice(&mut self, name: &str, options: &[String]) {
        self.events.push(SnippetEvent::NamedChoice {
            name: name.to_owned(),
            options: options.to_vec(),
        });
    }

    fn start_placeholder(&mut self, index: u32, name: &str, level: u32) {
        self.events
            .push(SnippetEvent::placeholder_start(index, name, level));
    }

    fn end_placeholder(&mut self, level: u32) {
        self.events.push(SnippetEvent::PlaceholderEnd { level });
    }

    fn variable(&mut self, name: &str) {
        self.events.push(SnippetEvent::variable(name));
    }
}
