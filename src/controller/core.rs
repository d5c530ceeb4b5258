use crate::config::PollPolicy;
use crate::console::{Console, ConsoleSnapshot, ConsoleView, IndicatorState, Severity};
use crate::controller::poller::{self, PollerHandle};
use crate::playback::{PlaybackCompletion, PlaybackDevice, PlaybackOutcome};
use crate::session::SessionState;
use crate::transport::{AudioPayload, SpeechBackend};
use crate::{messages, Error, ErrorContext, Result};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tracing::{debug, info, warn};

/// Drives the status endpoint, the synthesis endpoint and the playback device,
/// and reports everything through the console.
///
/// Cloning is cheap; clones share one session. No operation returns an
/// error: outcomes are visible through [`ClientController::snapshot`] and the
/// attached view.
#[derive(Clone)]
pub struct ClientController {
    inner: Arc<Inner>,
}

/// Non-owning reference used by background tasks.
#[derive(Clone)]
pub(crate) struct WeakController {
    inner: Weak<Inner>,
}

impl WeakController {
    pub(crate) fn upgrade(&self) -> Option<ClientController> {
        self.inner.upgrade().map(|inner| ClientController { inner })
    }
}

struct Inner {
    backend: Arc<dyn SpeechBackend>,
    playback: Arc<dyn PlaybackDevice>,
    policy: PollPolicy,
    session: Mutex<SessionState>,
    console: Mutex<Console>,
    poller: Mutex<Option<PollerHandle>>,
}

fn require_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::validation_with_context(
            messages::EMPTY_TEXT,
            ErrorContext::new()
                .with_field_path("text")
                .with_source("controller"),
        ));
    }
    Ok(())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ClientController {
    pub fn builder() -> super::ClientControllerBuilder {
        super::ClientControllerBuilder::new()
    }

    pub(crate) fn new(
        backend: Arc<dyn SpeechBackend>,
        playback: Arc<dyn PlaybackDevice>,
        view: Arc<dyn ConsoleView>,
        policy: PollPolicy,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                playback,
                policy,
                session: Mutex::new(SessionState::new(policy.limit())),
                console: Mutex::new(Console::new(view)),
                poller: Mutex::new(None),
            }),
        }
    }

    pub(crate) fn downgrade(&self) -> WeakController {
        WeakController {
            inner: Arc::downgrade(&self.inner),
        }
    }

    fn session(&self) -> MutexGuard<'_, SessionState> {
        lock(&self.inner.session)
    }

    fn console(&self) -> MutexGuard<'_, Console> {
        lock(&self.inner.console)
    }

    /// Log startup, check status once, then start the periodic status timer.
    ///
    /// Calling this again replaces the previous timer and resets the
    /// automatic check count.
    pub async fn initialize(&self) {
        info!(policy = %self.inner.policy, "initializing console client");
        if let Some(previous) = lock(&self.inner.poller).take() {
            previous.cancel();
        }

        self.add_log(messages::INITIALIZING, Severity::Info);
        self.check_status().await;

        self.session().reset_auto_checks();
        let handle = poller::spawn(self.downgrade(), self.inner.policy);
        if let Some(previous) = lock(&self.inner.poller).replace(handle) {
            previous.cancel();
        }
    }

    /// Query the status endpoint and reflect the answer in the session and console.
    ///
    /// Overlapping calls are not deduplicated; the last one to finish wins.
    pub async fn check_status(&self) {
        self.update_status_indicator(IndicatorState::Loading, messages::STATUS_CHECKING);

        match self.inner.backend.status().await {
            Ok(report) if report.is_ok() => {
                debug!("backend reports ok");
                self.session().set_api_available(true);
                let mut console = self.console();
                console.set_indicator(IndicatorState::Ok, messages::STATUS_OK);
                console.set_play_enabled(true);
                console.append(messages::STATUS_CONNECTED, Severity::Success);
            }
            Ok(report) => {
                let message = report
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| messages::STATUS_API_ERROR.to_string());
                warn!(status = %report.status, %message, "backend reports a problem");
                self.session().set_api_available(false);
                let mut console = self.console();
                console.set_indicator(IndicatorState::Error, message.clone());
                console.set_play_enabled(false);
                console.append(messages::api_error(&message), Severity::Error);
            }
            Err(err) => {
                warn!(error = %err, "status endpoint unreachable");
                self.session().set_api_available(false);
                let mut console = self.console();
                console.set_indicator(IndicatorState::Error, messages::STATUS_SERVER_ERROR);
                console.set_play_enabled(false);
                console.append(messages::server_error(&err.to_string()), Severity::Error);
            }
        }
    }

    /// Synthesize `text` and play the result, replacing any current playback.
    ///
    /// Blank input is rejected with a log entry before anything else happens.
    pub async fn submit_and_play(&self, text: &str) {
        if let Err(err) = require_text(text) {
            debug!(error = %err, "synthesis request rejected");
            self.add_log(messages::EMPTY_TEXT, Severity::Error);
            return;
        }

        if self.session().stop_playback() {
            debug!("stopped previous playback");
        }

        self.add_log(messages::synthesis_request(text), Severity::Info);
        {
            let mut console = self.console();
            console.set_indicator(IndicatorState::Loading, messages::GENERATING);
            console.set_play_enabled(false);
        }

        match self.inner.backend.synthesize(text).await {
            Ok(payload) => self.start_playback(payload),
            Err(err) => self.synthesis_failed(err).await,
        }
    }

    fn start_playback(&self, payload: AudioPayload) {
        debug!(bytes = payload.len(), "starting playback");
        // Stop, start and install under one lock so two submissions can never
        // leave two playbacks running.
        let started = {
            let mut session = self.session();
            session.stop_playback();
            self.inner.playback.start(payload).map(|active| {
                let (control, completion) = active.into_parts();
                (session.install_playback(control), completion)
            })
        };

        self.add_log(messages::GENERATED, Severity::Success);

        match started {
            Ok((id, completion)) => self.watch_playback(id, completion),
            Err(err) => {
                warn!(error = %err, "playback device rejected audio");
                self.playback_failed();
            }
        }
    }

    fn watch_playback(&self, id: u64, completion: PlaybackCompletion) {
        let controller = self.downgrade();
        tokio::spawn(async move {
            let outcome = completion.wait().await;
            if let Some(controller) = controller.upgrade() {
                controller.playback_ended(id, outcome);
            }
        });
    }

    fn playback_ended(&self, id: u64, outcome: Option<PlaybackOutcome>) {
        let Some(outcome) = outcome else {
            debug!(id, "playback stopped before completion");
            return;
        };
        if !self.session().release_playback(id) {
            debug!(id, "ignoring completion of a replaced playback");
            return;
        }

        match outcome {
            PlaybackOutcome::Finished => {
                let mut console = self.console();
                console.append(messages::PLAYBACK_FINISHED, Severity::Success);
                console.set_indicator(IndicatorState::Ok, messages::STATUS_OK);
                console.set_play_enabled(true);
            }
            PlaybackOutcome::Failed(reason) => {
                warn!(id, %reason, "playback failed");
                self.playback_failed();
            }
        }
    }

    fn playback_failed(&self) {
        let mut console = self.console();
        console.append(messages::PLAYBACK_ERROR, Severity::Error);
        console.set_indicator(IndicatorState::Error, messages::PLAYBACK_ERROR);
        console.set_play_enabled(true);
    }

    async fn synthesis_failed(&self, err: Error) {
        let message = err.to_string();
        warn!(error = %message, "synthesis failed");
        {
            let mut console = self.console();
            console.append(messages::synthesis_error(&message), Severity::Error);
            console.set_indicator(IndicatorState::Error, message.clone());
            console.set_play_enabled(true);
        }

        let policy = self.inner.policy;
        if policy.rechecks_after_failure() {
            self.check_status().await;
        } else if policy.detects_rate_limits() && messages::mentions_rate_limit(&message) {
            self.add_log(messages::RATE_LIMITED, Severity::Error);
        }
    }

    /// One tick of the status timer. Returns whether the timer should keep running.
    pub(crate) fn poll_tick(&self) -> bool {
        let count = {
            let mut session = self.session();
            if session.auto_checks_exhausted() {
                None
            } else {
                Some(session.record_auto_check())
            }
        };

        if let Some(count) = count {
            debug!(count, "automatic status check");
            let controller = self.clone();
            tokio::spawn(async move { controller.check_status().await });
        }

        if self.session().auto_checks_exhausted() {
            let count = self.auto_check_count();
            info!(count, "automatic status checks exhausted");
            self.add_log(messages::auto_checks_stopped(count), Severity::Info);
            return false;
        }
        true
    }

    /// Append a log entry stamped with the current wall-clock time.
    pub fn add_log(&self, message: impl Into<String>, severity: Severity) {
        self.console().append(message, severity);
    }

    pub fn update_status_indicator(&self, state: IndicatorState, message: impl Into<String>) {
        self.console().set_indicator(state, message);
    }

    /// Stop the current playback, if any, without reporting it.
    pub fn stop_playback(&self) {
        self.session().stop_playback();
    }

    /// Cancel the status timer and stop playback.
    pub fn shutdown(&self) {
        if let Some(handle) = lock(&self.inner.poller).take() {
            handle.cancel();
        }
        self.stop_playback();
        debug!("console client shut down");
    }

    pub fn api_available(&self) -> bool {
        self.session().api_available()
    }

    pub fn play_enabled(&self) -> bool {
        self.console().play_enabled()
    }

    pub fn has_active_playback(&self) -> bool {
        self.session().has_active_playback()
    }

    pub fn auto_check_count(&self) -> u32 {
        self.session().auto_check_count()
    }

    /// Whether the status timer is still running.
    pub fn is_polling(&self) -> bool {
        lock(&self.inner.poller)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn policy(&self) -> PollPolicy {
        self.inner.policy
    }

    pub fn snapshot(&self) -> ConsoleSnapshot {
        self.console().snapshot()
    }
}
