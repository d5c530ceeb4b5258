//! Audio output via `rodio`.
//!
//! `rodio::OutputStream` is `!Send` on some platforms, so each playback owns
//! a dedicated OS thread holding the stream, the sink and the decoder. The
//! thread is driven through a stop channel and reports through the
//! completion channel.

use super::{completion_channel, ActivePlayback, CompletionReporter, PlaybackControl, PlaybackDevice};
use crate::transport::AudioPayload;
use crate::{Error, ErrorContext, Result};
use rodio::{Decoder, OutputStream, Sink};
use std::io::Cursor;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tracing::debug;

const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Plays audio on the default output device.
pub struct RodioPlayback {
    _private: (),
}

impl RodioPlayback {
    /// Fails when no default output device can be opened.
    pub fn new() -> Result<Self> {
        let (_stream, _handle) = OutputStream::try_default().map_err(|e| {
            Error::playback_with_context(
                format!("No audio output device: {}", e),
                ErrorContext::new().with_source("rodio_playback"),
            )
        })?;
        debug!("default audio output device available");
        Ok(Self { _private: () })
    }
}

impl PlaybackDevice for RodioPlayback {
    fn start(&self, payload: AudioPayload) -> Result<ActivePlayback> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let (reporter, completion) = completion_channel();

        thread::Builder::new()
            .name("tts-playback".to_string())
            .spawn(move || run_playback(payload, stop_rx, reporter))?;

        Ok(ActivePlayback::new(
            Box::new(RodioControl {
                stop_tx: Some(stop_tx),
            }),
            completion,
        ))
    }
}

struct RodioControl {
    stop_tx: Option<mpsc::Sender<()>>,
}

impl PlaybackControl for RodioControl {
    fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn run_playback(payload: AudioPayload, stop_rx: mpsc::Receiver<()>, reporter: CompletionReporter) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => return reporter.fail(format!("output stream: {}", e)),
    };
    let sink = match Sink::try_new(&handle) {
        Ok(sink) => sink,
        Err(e) => return reporter.fail(format!("sink: {}", e)),
    };
    let source = match Decoder::new(Cursor::new(payload.data.to_vec())) {
        Ok(source) => source,
        Err(e) => return reporter.fail(format!("decode: {}", e)),
    };

    sink.append(source);
    debug!(bytes = payload.len(), "playback started");

    loop {
        match stop_rx.recv_timeout(DRAIN_POLL) {
            // Explicit stop, or the control was dropped: no outcome is reported.
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                sink.stop();
                debug!("playback stopped");
                return;
            }
            Err(RecvTimeoutError::Timeout) => {
                if sink.empty() {
                    debug!("playback drained");
                    return reporter.finish();
                }
            }
        }
    }
}
