//! Status indicator: a classification plus a line of text.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorState {
    Loading,
    Ok,
    Error,
}

impl IndicatorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorState::Loading => "loading",
            IndicatorState::Ok => "ok",
            IndicatorState::Error => "error",
        }
    }
}

impl fmt::Display for IndicatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusIndicator {
    pub state: IndicatorState,
    pub message: String,
}

impl StatusIndicator {
    pub fn new(state: IndicatorState, message: impl Into<String>) -> Self {
        Self {
            state,
            message: message.into(),
        }
    }
}

impl Default for StatusIndicator {
    fn default() -> Self {
        Self::new(IndicatorState::Loading, "")
    }
}
