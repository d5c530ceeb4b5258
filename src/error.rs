//! 错误类型：客户端所有底层错误统一汇总到 [`Error`]。
//!
//! Unified error type for the console client.

use std::fmt;
use thiserror::Error;

/// Where an error came from.
///
/// Rendered after the message as `(field: .., details: .., source: ..)`,
/// omitting whatever is unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Config key or input that was rejected: `backend.base_url`, `poll_policy`, `text`.
    pub field_path: Option<String>,
    pub details: Option<String>,
    /// Component that raised the error: `backend_config`, `controller`, `file_playback`.
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            ("field", &self.field_path),
            ("details", &self.details),
            ("source", &self.source),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_ref().map(|v| format!("{label}: {v}")))
        .collect();

        if parts.is_empty() {
            Ok(())
        } else {
            write!(f, " ({})", parts.join(", "))
        }
    }
}

/// Unified error type for the console client.
///
/// The controller recovers every one of these locally and reports them through
/// the console log; they only surface to callers from constructors and from the
/// backend/playback seams.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {message}{context}")]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    /// The synthesis endpoint answered with a non-success status.
    ///
    /// `message` is the server-supplied text (or a default), shown to the user as-is.
    #[error("{message}")]
    Synthesis { status: u16, message: String },

    #[error("Network transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Playback error: {message}{context}")]
    Playback {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Rejected user input, such as blank text for synthesis.
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn playback_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Playback {
            message: msg.into(),
            context,
        }
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Validation { context, .. }
            | Error::Configuration { context, .. }
            | Error::Playback { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Whether this error means the backend could not be reached or understood,
    /// as opposed to the backend answering with a failure.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Serialization(_))
    }
}
