//! Logging capability handed to every piece stage

use std::sync::Mutex;

/// Severity of a piece log event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// Sink for piece log events.
///
/// Stages receive a `&dyn PieceLog` instead of logging globally, so the
/// destination can be swapped without touching the stage code.
pub trait PieceLog {
    /// Record one event
    fn log(&self, level: Level, message: &str);

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }
}

/// Forwards events to `tracing`, tagged with the piece name
#[derive(Debug, Clone, Copy)]
pub struct TracingLog {
    piece: &'static str,
}

impl TracingLog {
    pub fn new(piece: &'static str) -> Self {
        Self { piece }
    }
}

impl PieceLog for TracingLog {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Debug => tracing::debug!(piece = self.piece, "{}", message),
            Level::Info => tracing::info!(piece = self.piece, "{}", message),
            Level::Warn => tracing::warn!(piece = self.piece, "{}", message),
            Level::Error => tracing::error!(piece = self.piece, "{}", message),
        }
    }
}

/// Keeps events in memory, for callers that report them elsewhere
#[derive(Debug, Default)]
pub struct MemoryLog {
    events: Mutex<Vec<(Level, String)>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events in order
    pub fn events(&self) -> Vec<(Level, String)> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Messages recorded at `level`
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }
}

impl PieceLog for MemoryLog {
    fn log(&self, level: Level, message: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push((level, message.to_string()));
        }
    }
}
