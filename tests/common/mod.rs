//! Shared test doubles: a scripted backend and a recording playback device.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tts_console::playback::{
    completion_channel, ActivePlayback, CompletionReporter, PlaybackControl, PlaybackDevice,
};
use tts_console::{
    AudioPayload, ClientController, Error, ErrorContext, PollPolicy, Result, SpeechBackend,
    StatusReport,
};

/// What the scripted backend answers to a status request.
#[derive(Debug, Clone)]
pub enum StatusScript {
    Ok,
    Problem(Option<String>),
    Unreachable,
}

/// What the scripted backend answers to a synthesis request.
#[derive(Debug, Clone)]
pub enum SynthScript {
    Audio(Vec<u8>),
    Fail { status: u16, message: String },
    Unreachable,
}

/// In-memory backend with call counters.
pub struct ScriptedBackend {
    status: Mutex<StatusScript>,
    synth: Mutex<VecDeque<SynthScript>>,
    status_calls: AtomicUsize,
    synth_texts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            status: Mutex::new(StatusScript::Ok),
            synth: Mutex::new(VecDeque::new()),
            status_calls: AtomicUsize::new(0),
            synth_texts: Mutex::new(Vec::new()),
        }
    }

    pub fn set_status(&self, script: StatusScript) {
        *self.status.lock().unwrap() = script;
    }

    /// Queue answers for upcoming synthesis requests; unqueued requests get audio.
    pub fn push_synth(&self, script: SynthScript) {
        self.synth.lock().unwrap().push_back(script);
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn synth_texts(&self) -> Vec<String> {
        self.synth_texts.lock().unwrap().clone()
    }
}

fn refused() -> Error {
    Error::Io(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    ))
}

#[async_trait]
impl SpeechBackend for ScriptedBackend {
    async fn status(&self) -> Result<StatusReport> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let script = self.status.lock().unwrap().clone();
        match script {
            StatusScript::Ok => Ok(StatusReport::ok()),
            StatusScript::Problem(message) => Ok(StatusReport {
                status: "error".to_string(),
                message,
            }),
            StatusScript::Unreachable => Err(refused()),
        }
    }

    async fn synthesize(&self, text: &str) -> Result<AudioPayload> {
        self.synth_texts.lock().unwrap().push(text.to_string());
        let script = self
            .synth
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| SynthScript::Audio(b"RIFF....WAVE".to_vec()));
        match script {
            SynthScript::Audio(bytes) => {
                Ok(AudioPayload::new(bytes).with_content_type("audio/wav"))
            }
            SynthScript::Fail { status, message } => Err(Error::Synthesis { status, message }),
            SynthScript::Unreachable => Err(refused()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    Started(usize),
    Stopped(usize),
}

type Reporters = Arc<Mutex<Vec<Option<CompletionReporter>>>>;

/// Playback device that records starts/stops and lets the test decide how
/// each playback ends.
pub struct RecordingPlayback {
    events: Arc<Mutex<Vec<PlaybackEvent>>>,
    reporters: Reporters,
    reject: Mutex<bool>,
}

impl RecordingPlayback {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            reporters: Arc::new(Mutex::new(Vec::new())),
            reject: Mutex::new(false),
        }
    }

    /// Make the next `start` fail, as a device that cannot open the payload would.
    pub fn reject_next(&self) {
        *self.reject.lock().unwrap() = true;
    }

    pub fn events(&self) -> Vec<PlaybackEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn started(&self) -> usize {
        self.reporters.lock().unwrap().len()
    }

    pub fn finish(&self, n: usize) {
        let reporter = self.reporters.lock().unwrap()[n].take();
        if let Some(reporter) = reporter {
            reporter.finish();
        }
    }

    pub fn fail(&self, n: usize, reason: &str) {
        let reporter = self.reporters.lock().unwrap()[n].take();
        if let Some(reporter) = reporter {
            reporter.fail(reason);
        }
    }
}

struct RecordingControl {
    id: usize,
    events: Arc<Mutex<Vec<PlaybackEvent>>>,
    reporters: Reporters,
    stopped: bool,
}

impl PlaybackControl for RecordingControl {
    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.events
                .lock()
                .unwrap()
                .push(PlaybackEvent::Stopped(self.id));
            // Dropping the reporter closes the completion without an outcome.
            let reporter = self.reporters.lock().unwrap()[self.id].take();
            drop(reporter);
        }
    }
}

impl PlaybackDevice for RecordingPlayback {
    fn start(&self, _payload: AudioPayload) -> Result<ActivePlayback> {
        {
            let mut reject = self.reject.lock().unwrap();
            if *reject {
                *reject = false;
                return Err(Error::playback_with_context(
                    "unsupported payload",
                    ErrorContext::new().with_source("recording_playback"),
                ));
            }
        }

        let (reporter, completion) = completion_channel();
        let id = {
            let mut reporters = self.reporters.lock().unwrap();
            reporters.push(Some(reporter));
            reporters.len() - 1
        };
        self.events.lock().unwrap().push(PlaybackEvent::Started(id));

        Ok(ActivePlayback::new(
            Box::new(RecordingControl {
                id,
                events: self.events.clone(),
                reporters: self.reporters.clone(),
                stopped: false,
            }),
            completion,
        ))
    }
}

pub fn controller(
    backend: Arc<ScriptedBackend>,
    playback: Arc<RecordingPlayback>,
    policy: PollPolicy,
) -> ClientController {
    ClientController::builder()
        .backend(backend)
        .playback(playback)
        .policy(policy)
        .build()
        .expect("controller")
}

/// Poll `condition` until it holds, failing the test after a couple of seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}
