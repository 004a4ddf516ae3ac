//! Leveled message reporting for sprite builds.
//!
//! Recoverable conditions never abort the run; they are emitted through a
//! [`MessageSink`] injected into the pipeline. The build owns no output
//! streams itself, which also lets tests capture everything that was said.

use std::fmt;
use std::sync::Mutex;

/// Message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => write!(f, "INFO"),
            Level::Warning => write!(f, "WARNING"),
            Level::Error => write!(f, "ERROR"),
        }
    }
}

/// Fixed vocabulary of build conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// More than one `svg-sprite-image` rule in a stylesheet
    MultipleDirectiveRules,
    /// Referenced SVG asset file does not exist
    MissingSourceAsset,
    /// SVG asset rejected by structural validation
    MalformedSvgSource,
    /// Stylesheet content is empty at rewrite time
    EmptyStylesheet,
    /// Directive has no matched text or no resolved reference at rewrite time
    EmptyReplacement,
    /// Anything else worth reporting
    Generic,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::MultipleDirectiveRules => write!(f, "multiple_directive_rules"),
            MessageKind::MissingSourceAsset => write!(f, "missing_source_asset"),
            MessageKind::MalformedSvgSource => write!(f, "malformed_svg_source"),
            MessageKind::EmptyStylesheet => write!(f, "empty_stylesheet"),
            MessageKind::EmptyReplacement => write!(f, "empty_replacement"),
            MessageKind::Generic => write!(f, "generic"),
        }
    }
}

/// One reported message.
#[derive(Debug, Clone)]
pub struct Message {
    pub level: Level,
    pub kind: MessageKind,
    pub text: String,
}

/// Receiver for build messages.
pub trait MessageSink {
    fn emit(&self, message: Message);

    fn info(&self, kind: MessageKind, text: &str) {
        self.emit(Message { level: Level::Info, kind, text: text.to_string() });
    }

    fn warning(&self, kind: MessageKind, text: &str) {
        self.emit(Message { level: Level::Warning, kind, text: text.to_string() });
    }

    fn error(&self, kind: MessageKind, text: &str) {
        self.emit(Message { level: Level::Error, kind, text: text.to_string() });
    }
}

/// Sink that prints to stdout/stderr, filtered by a minimum level.
#[derive(Debug)]
pub struct ConsoleSink {
    min_level: Level,
}

impl ConsoleSink {
    pub fn new(min_level: Level) -> Self {
        Self { min_level }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}

impl MessageSink for ConsoleSink {
    fn emit(&self, message: Message) {
        if message.level < self.min_level {
            return;
        }
        match message.level {
            Level::Info => println!("{}: {}", message.level, message.text),
            Level::Warning | Level::Error => {
                eprintln!("{} [{}]: {}", message.level, message.kind, message.text)
            }
        }
    }
}

/// Sink that discards everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl MessageSink for NullSink {
    fn emit(&self, _message: Message) {}
}

/// Sink that records messages for later inspection. Used by tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<Message>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Messages at or above the given level.
    pub fn at_least(&self, level: Level) -> Vec<Message> {
        self.messages().into_iter().filter(|m| m.level >= level).collect()
    }

    /// Messages of one kind.
    pub fn of_kind(&self, kind: MessageKind) -> Vec<Message> {
        self.messages().into_iter().filter(|m| m.kind == kind).collect()
    }
}

impl MessageSink for RecordingSink {
    fn emit(&self, message: Message) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message);
        }
    }
}
