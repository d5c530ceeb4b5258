use super::{completion_channel, ActivePlayback, DetachedControl, PlaybackDevice};
use crate::transport::AudioPayload;
use crate::{Error, ErrorContext, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::runtime::Handle;
use tracing::{info, warn};

/// "Plays" audio by writing each payload to a file.
///
/// Used when no audio output is compiled in. The write runs on the tokio
/// runtime; the playback finishes once the file is written and fails if the
/// write does.
pub struct FilePlayback {
    dir: PathBuf,
    counter: AtomicU64,
}

impl FilePlayback {
    /// Creates `dir` if it does not exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            counter: AtomicU64::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn next_path(&self, payload: &AudioPayload) -> PathBuf {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        self.dir
            .join(format!("speech-{}-{:03}.{}", stamp, n, payload.extension()))
    }
}

impl PlaybackDevice for FilePlayback {
    fn start(&self, payload: AudioPayload) -> Result<ActivePlayback> {
        if payload.is_empty() {
            return Err(Error::playback_with_context(
                "Received an empty audio payload",
                ErrorContext::new().with_source("file_playback"),
            ));
        }

        let runtime = Handle::try_current().map_err(|e| {
            Error::playback_with_context(
                "File output needs a tokio runtime",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("file_playback"),
            )
        })?;

        let path = self.next_path(&payload);
        let (reporter, completion) = completion_channel();
        runtime.spawn(async move {
            match tokio::fs::write(&path, &payload.data).await {
                Ok(()) => {
                    info!(path = %path.display(), bytes = payload.len(), "audio written");
                    reporter.finish();
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "cannot write audio file");
                    reporter.fail(format!("write {}: {}", path.display(), e));
                }
            }
        });

        Ok(ActivePlayback::new(Box::new(DetachedControl), completion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackOutcome;

    #[tokio::test]
    async fn test_writes_payload_and_finishes() {
        let dir = tempfile::tempdir().unwrap();
        let device = FilePlayback::new(dir.path().join("out")).unwrap();

        let payload = AudioPayload::new(vec![0x49u8, 0x44, 0x33]).with_content_type("audio/mpeg");
        let active = device.start(payload).unwrap();
        let (_control, completion) = active.into_parts();
        assert_eq!(completion.wait().await, Some(PlaybackOutcome::Finished));

        let files: Vec<_> = std::fs::read_dir(device.dir())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].extension().and_then(|e| e.to_str()), Some("mp3"));
        assert_eq!(std::fs::read(&files[0]).unwrap(), vec![0x49u8, 0x44, 0x33]);
    }

    #[tokio::test]
    async fn test_write_failure_is_reported_as_failed() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let device = FilePlayback::new(&out).unwrap();
        std::fs::remove_dir(&out).unwrap();

        let active = device.start(AudioPayload::new(vec![1u8, 2, 3])).unwrap();
        let (_control, completion) = active.into_parts();
        match completion.wait().await {
            Some(PlaybackOutcome::Failed(reason)) => assert!(reason.contains("speech-")),
            other => panic!("expected a failed write, got {other:?}"),
        }
    }

    #[test]
    fn test_start_outside_runtime_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let device = FilePlayback::new(dir.path()).unwrap();
        let err = device.start(AudioPayload::new(vec![1u8])).err().unwrap();
        assert!(matches!(err, Error::Playback { .. }));
    }

    #[test]
    fn test_empty_payload_is_a_playback_error() {
        let dir = tempfile::tempdir().unwrap();
        let device = FilePlayback::new(dir.path()).unwrap();
        let err = device.start(AudioPayload::new(Vec::new())).err().unwrap();
        assert!(matches!(err, Error::Playback { .. }));
    }
}
