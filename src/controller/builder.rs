use super::ClientController;
use crate::config::{BackendConfig, PollPolicy};
use crate::console::{noop_view, ConsoleView};
use crate::playback::PlaybackDevice;
use crate::transport::{HttpBackend, SpeechBackend};
use crate::{Error, Result};
use std::sync::Arc;

/// Builder for [`ClientController`].
///
/// Only the playback device is mandatory. Without an explicit backend, an
/// [`HttpBackend`] is built from the given [`BackendConfig`] (or from the
/// environment).
pub struct ClientControllerBuilder {
    backend: Option<Arc<dyn SpeechBackend>>,
    backend_config: Option<BackendConfig>,
    playback: Option<Arc<dyn PlaybackDevice>>,
    view: Arc<dyn ConsoleView>,
    policy: PollPolicy,
}

impl ClientControllerBuilder {
    pub fn new() -> Self {
        Self {
            backend: None,
            backend_config: None,
            playback: None,
            view: noop_view(),
            policy: PollPolicy::default(),
        }
    }

    /// Use a custom backend instead of HTTP.
    pub fn backend(mut self, backend: Arc<dyn SpeechBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Configure the HTTP backend. Ignored when [`Self::backend`] is set.
    pub fn backend_config(mut self, config: BackendConfig) -> Self {
        self.backend_config = Some(config);
        self
    }

    pub fn playback(mut self, device: Arc<dyn PlaybackDevice>) -> Self {
        self.playback = Some(device);
        self
    }

    /// Attach a view. Default is a no-op view.
    pub fn view(mut self, view: Arc<dyn ConsoleView>) -> Self {
        self.view = view;
        self
    }

    pub fn policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> Result<ClientController> {
        let playback = self
            .playback
            .ok_or_else(|| Error::configuration("Playback device must be specified"))?;

        let backend = match self.backend {
            Some(backend) => backend,
            None => {
                let config = match self.backend_config {
                    Some(config) => config,
                    None => BackendConfig::from_env()?,
                };
                Arc::new(HttpBackend::new(config)?) as Arc<dyn SpeechBackend>
            }
        };

        Ok(ClientController::new(backend, playback, self.view, self.policy))
    }
}

impl Default for ClientControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
