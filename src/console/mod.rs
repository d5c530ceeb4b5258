//! 控制台模块：状态指示器、播放按钮状态和活动日志。
//!
//! Console state shown to the user: status indicator, play action and
//! activity log.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Console`] | Authoritative console state plus the attached view |
//! | [`ConsoleSnapshot`] | Point-in-time copy for rendering and assertions |
//! | [`LogBuffer`] | Append-only log with auto-scroll |
//! | [`ConsoleView`] | Rendering seam |

pub mod log;
pub mod status;
pub mod view;

pub use log::{LogBuffer, LogEntry, Severity};
pub use status::{IndicatorState, StatusIndicator};
pub use view::{noop_view, ConsoleView, InMemoryView, NoopView, TerminalView, ViewEvent};

use serde::Serialize;
use std::sync::Arc;

/// Point-in-time copy of the console.
#[derive(Debug, Clone, Serialize)]
pub struct ConsoleSnapshot {
    pub indicator: StatusIndicator,
    pub play_enabled: bool,
    pub log: Vec<LogEntry>,
    pub scroll_position: usize,
}

impl ConsoleSnapshot {
    pub fn entries_with(&self, severity: Severity) -> Vec<&LogEntry> {
        self.log.iter().filter(|e| e.severity == severity).collect()
    }

    pub fn log_messages(&self) -> Vec<&str> {
        self.log.iter().map(|e| e.message.as_str()).collect()
    }
}

/// Console state; every mutation is forwarded to the view.
pub struct Console {
    indicator: StatusIndicator,
    play_enabled: bool,
    log: LogBuffer,
    view: Arc<dyn ConsoleView>,
}

impl Console {
    /// Starts in the loading state with the play action disabled.
    pub fn new(view: Arc<dyn ConsoleView>) -> Self {
        Self {
            indicator: StatusIndicator::default(),
            play_enabled: false,
            log: LogBuffer::new(),
            view,
        }
    }

    pub fn append(&mut self, message: impl Into<String>, severity: Severity) {
        let entry = LogEntry::new(message, severity);
        self.view.log_appended(&entry);
        self.log.push(entry);
    }

    pub fn set_indicator(&mut self, state: IndicatorState, message: impl Into<String>) {
        self.indicator = StatusIndicator::new(state, message);
        self.view.status_changed(&self.indicator);
    }

    pub fn set_play_enabled(&mut self, enabled: bool) {
        self.play_enabled = enabled;
        self.view.play_action_changed(enabled);
    }

    pub fn indicator(&self) -> &StatusIndicator {
        &self.indicator
    }

    pub fn play_enabled(&self) -> bool {
        self.play_enabled
    }

    pub fn log(&self) -> &LogBuffer {
        &self.log
    }

    pub fn snapshot(&self) -> ConsoleSnapshot {
        ConsoleSnapshot {
            indicator: self.indicator.clone(),
            play_enabled: self.play_enabled,
            log: self.log.entries().to_vec(),
            scroll_position: self.log.scroll_position(),
        }
    }
}
