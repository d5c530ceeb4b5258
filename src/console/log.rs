//! Activity log: timestamped, severity-tagged entries kept in insertion order.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

/// Severity of a console log entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub severity: Severity,
}

impl LogEntry {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            timestamp: Local::now(),
            message: message.into(),
            severity,
        }
    }

    /// `[HH:MM:SS] message`, the way the entry is shown in the log view.
    pub fn render(&self) -> String {
        format!("[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Append-only entry list with a scroll position that follows the newest entry.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    entries: Vec<LogEntry>,
    scroll: usize,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append and scroll to it; returns the index of the new entry.
    pub fn push(&mut self, entry: LogEntry) -> usize {
        self.entries.push(entry);
        self.scroll = self.entries.len() - 1;
        self.scroll
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the entry the view is scrolled to (the last one once anything is logged).
    pub fn scroll_position(&self) -> usize {
        self.scroll
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }
}
