//! Views: where console changes get rendered.
//!
//! The controller owns the console state; a view is only told about changes.
//!
//! | View | Description |
//! |------|-------------|
//! | [`NoopView`] | Renders nothing (default) |
//! | [`TerminalView`] | Prints to stdout |
//! | [`InMemoryView`] | Records notifications for embedding and tests |

use super::log::{LogEntry, Severity};
use super::status::StatusIndicator;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Receives every console change, in the order the controller makes them.
///
/// Calls happen while the controller holds its console lock, so
/// implementations must not call back into the controller.
pub trait ConsoleView: Send + Sync {
    fn status_changed(&self, indicator: &StatusIndicator);
    fn play_action_changed(&self, enabled: bool);
    fn log_appended(&self, entry: &LogEntry);
}

/// View that ignores everything.
pub struct NoopView;

impl ConsoleView for NoopView {
    fn status_changed(&self, _indicator: &StatusIndicator) {}
    fn play_action_changed(&self, _enabled: bool) {}
    fn log_appended(&self, _entry: &LogEntry) {}
}

/// Returns a shared [`NoopView`].
pub fn noop_view() -> Arc<dyn ConsoleView> {
    Arc::new(NoopView)
}

/// Line-oriented terminal rendering.
///
/// Log entries print as `[HH:MM:SS] message` with a severity marker; status
/// changes print only when `show_status` is set.
pub struct TerminalView {
    show_status: bool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self { show_status: true }
    }

    pub fn with_status_lines(mut self, show: bool) -> Self {
        self.show_status = show;
        self
    }

    fn marker(severity: Severity) -> &'static str {
        match severity {
            Severity::Info => " ",
            Severity::Success => "+",
            Severity::Error => "!",
        }
    }

    fn write_line(line: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{}", line);
        let _ = stdout.flush();
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleView for TerminalView {
    fn status_changed(&self, indicator: &StatusIndicator) {
        if self.show_status {
            Self::write_line(&format!("  <{}> {}", indicator.state, indicator.message));
        }
    }

    fn play_action_changed(&self, _enabled: bool) {}

    fn log_appended(&self, entry: &LogEntry) {
        Self::write_line(&format!("{} {}", Self::marker(entry.severity), entry.render()));
    }
}

/// A single recorded view notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Status(StatusIndicator),
    PlayAction(bool),
    Log(LogEntry),
}

/// View that records notifications in memory.
#[derive(Default)]
pub struct InMemoryView {
    events: Mutex<Vec<ViewEvent>>,
}

impl InMemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.lock().clone()
    }

    pub fn log_messages(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Log(entry) => Some(entry.message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ViewEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ConsoleView for InMemoryView {
    fn status_changed(&self, indicator: &StatusIndicator) {
        self.lock().push(ViewEvent::Status(indicator.clone()));
    }

    fn play_action_changed(&self, enabled: bool) {
        self.lock().push(ViewEvent::PlayAction(enabled));
    }

    fn log_appended(&self, entry: &LogEntry) {
        self.lock().push(ViewEvent::Log(entry.clone()));
    }
}
