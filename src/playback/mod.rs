//! 播放模块：把合成得到的音频交给输出设备播放。
//!
//! Playback devices.
//!
//! A device turns an [`AudioPayload`] into an [`ActivePlayback`]: a stop
//! control plus a completion that resolves once, when playback ends on its
//! own. Stopping a playback closes its completion without an outcome.

mod file;
#[cfg(feature = "audio-output")]
mod rodio_device;

pub use file::FilePlayback;
#[cfg(feature = "audio-output")]
pub use rodio_device::RodioPlayback;

use crate::transport::AudioPayload;
use crate::Result;
use tokio::sync::oneshot;

/// How a playback ended on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Finished,
    Failed(String),
}

/// Stops a running playback. Stopping twice is a no-op.
pub trait PlaybackControl: Send {
    fn stop(&mut self);
}

/// Audio output used by the controller.
pub trait PlaybackDevice: Send + Sync {
    /// Begin playing `payload` immediately.
    ///
    /// Errors that only show up while decoding may be reported later as
    /// [`PlaybackOutcome::Failed`] instead of here.
    fn start(&self, payload: AudioPayload) -> Result<ActivePlayback>;
}

/// Sending half of a playback completion, held by the device.
pub struct CompletionReporter {
    tx: oneshot::Sender<PlaybackOutcome>,
}

impl CompletionReporter {
    pub fn finish(self) {
        let _ = self.tx.send(PlaybackOutcome::Finished);
    }

    pub fn fail(self, reason: impl Into<String>) {
        let _ = self.tx.send(PlaybackOutcome::Failed(reason.into()));
    }
}

/// Resolves when a playback ends.
pub struct PlaybackCompletion {
    rx: oneshot::Receiver<PlaybackOutcome>,
}

impl PlaybackCompletion {
    /// `None` when the playback was stopped (or the device went away) first.
    pub async fn wait(self) -> Option<PlaybackOutcome> {
        self.rx.await.ok()
    }
}

/// Create a connected reporter/completion pair.
pub fn completion_channel() -> (CompletionReporter, PlaybackCompletion) {
    let (tx, rx) = oneshot::channel();
    (CompletionReporter { tx }, PlaybackCompletion { rx })
}

/// A playback that has been started.
pub struct ActivePlayback {
    control: Box<dyn PlaybackControl>,
    completion: PlaybackCompletion,
}

impl ActivePlayback {
    pub fn new(control: Box<dyn PlaybackControl>, completion: PlaybackCompletion) -> Self {
        Self {
            control,
            completion,
        }
    }

    pub fn into_parts(self) -> (Box<dyn PlaybackControl>, PlaybackCompletion) {
        (self.control, self.completion)
    }
}

/// Control for playbacks that have nothing left to stop.
pub struct DetachedControl;

impl PlaybackControl for DetachedControl {
    fn stop(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completion_reports_outcome() {
        let (reporter, completion) = completion_channel();
        reporter.fail("decoder");
        assert_eq!(
            completion.wait().await,
            Some(PlaybackOutcome::Failed("decoder".to_string()))
        );
    }

    #[tokio::test]
    async fn test_dropped_reporter_means_stopped() {
        let (reporter, completion) = completion_channel();
        drop(reporter);
        assert_eq!(completion.wait().await, None);
    }
}
