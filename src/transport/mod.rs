//! 传输层：与语音合成后端（状态端点、合成端点）通信。
//!
//! Backend transport: the status endpoint and the synthesis endpoint.
//!
//! The controller only talks to [`SpeechBackend`]; [`HttpBackend`] is the
//! production implementation over `reqwest`.

pub mod http;

pub use http::HttpBackend;

use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Status reported by the backend health check.
///
/// Anything other than `status == "ok"` means the backend is not usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusReport {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Audio returned by a successful synthesis request.
///
/// The bytes are opaque here; decoding belongs to the playback device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    pub data: Bytes,
    pub content_type: Option<String>,
}

impl AudioPayload {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// File extension matching the content type, `bin` when unknown.
    pub fn extension(&self) -> &'static str {
        let mime = self
            .content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_lowercase());
        match mime.as_deref() {
            Some("audio/mpeg") | Some("audio/mp3") => "mp3",
            Some("audio/wav") | Some("audio/x-wav") | Some("audio/wave") => "wav",
            Some("audio/ogg") | Some("audio/opus") => "ogg",
            Some("audio/flac") => "flac",
            Some("audio/aac") => "aac",
            _ => "bin",
        }
    }
}

/// The two backend operations the controller depends on.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Query the health endpoint.
    ///
    /// `Err` means the endpoint could not be reached or its answer could not be parsed.
    async fn status(&self) -> Result<StatusReport>;

    /// Submit `text` for synthesis.
    ///
    /// A non-success answer from the backend is [`crate::Error::Synthesis`].
    async fn synthesize(&self, text: &str) -> Result<AudioPayload>;
}
