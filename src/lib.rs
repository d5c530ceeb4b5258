//! # tts-console
//!
//! 语音合成后端的控制台客户端：轮询状态端点、提交文本合成语音并播放。
//!
//! Console client for a text-to-speech backend. It polls the backend health
//! endpoint, submits text for synthesis, plays the returned audio and keeps a
//! user-visible activity log of everything that happens.
//!
//! ## Key Features
//!
//! - **Controller**: [`ClientController`] owns the session and drives every operation
//! - **Status polling**: periodic health checks following a [`PollPolicy`]
//! - **Playback**: pluggable [`playback::PlaybackDevice`] (file output, or `rodio`
//!   with the `audio-output` feature), at most one playback at a time
//! - **Console**: status indicator, play action and log, rendered through a
//!   [`console::ConsoleView`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tts_console::{BackendConfig, ClientController, PollPolicy};
//! use tts_console::console::TerminalView;
//! use tts_console::playback::FilePlayback;
//!
//! #[tokio::main]
//! async fn main() -> tts_console::Result<()> {
//!     let controller = ClientController::builder()
//!         .backend_config(BackendConfig::new("http://127.0.0.1:5000")?)
//!         .playback(Arc::new(FilePlayback::new("speech")?))
//!         .view(Arc::new(TerminalView::new()))
//!         .policy(PollPolicy::continuous())
//!         .build()?;
//!
//!     controller.initialize().await;
//!     controller.submit_and_play("Hello there").await;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`controller`] | Client controller, builder and status timer |
//! | [`transport`] | Backend seam and the HTTP implementation |
//! | [`playback`] | Playback devices |
//! | [`console`] | Indicator, log and views |
//! | [`session`] | Controller-owned session state |
//! | [`config`] | Backend configuration and poll policy |

pub mod config;
pub mod console;
pub mod controller;
pub mod playback;
pub mod session;
pub mod transport;

mod messages;

pub use config::{BackendConfig, PollPolicy};
pub use console::{ConsoleSnapshot, IndicatorState, LogEntry, Severity};
pub use controller::{ClientController, ClientControllerBuilder};
pub use transport::{AudioPayload, HttpBackend, SpeechBackend, StatusReport};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
