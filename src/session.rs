//! Session state owned by the controller.

use crate::playback::PlaybackControl;

struct CurrentPlayback {
    id: u64,
    control: Box<dyn PlaybackControl>,
}

/// Controller-owned state for the lifetime of one session.
///
/// Holds at most one playback at a time; installing a new one requires the
/// previous one to have been taken out (and stopped) first.
pub struct SessionState {
    api_available: bool,
    current_playback: Option<CurrentPlayback>,
    auto_check_count: u32,
    auto_check_limit: Option<u32>,
    next_playback_id: u64,
}

impl SessionState {
    pub fn new(auto_check_limit: Option<u32>) -> Self {
        Self {
            api_available: false,
            current_playback: None,
            auto_check_count: 0,
            auto_check_limit,
            next_playback_id: 0,
        }
    }

    pub fn api_available(&self) -> bool {
        self.api_available
    }

    pub fn set_api_available(&mut self, available: bool) {
        self.api_available = available;
    }

    pub fn has_active_playback(&self) -> bool {
        self.current_playback.is_some()
    }

    /// Stop and drop the current playback, if any. Returns whether one existed.
    pub fn stop_playback(&mut self) -> bool {
        match self.current_playback.take() {
            Some(mut current) => {
                current.control.stop();
                true
            }
            None => false,
        }
    }

    /// Install a new playback and return its id.
    ///
    /// Any playback still installed is stopped first.
    pub fn install_playback(&mut self, control: Box<dyn PlaybackControl>) -> u64 {
        self.stop_playback();
        self.next_playback_id += 1;
        let id = self.next_playback_id;
        self.current_playback = Some(CurrentPlayback { id, control });
        id
    }

    /// Forget playback `id` after it ended on its own.
    ///
    /// Returns `false` when `id` is no longer the current playback.
    pub fn release_playback(&mut self, id: u64) -> bool {
        match &self.current_playback {
            Some(current) if current.id == id => {
                self.current_playback = None;
                true
            }
            _ => false,
        }
    }

    pub fn auto_check_count(&self) -> u32 {
        self.auto_check_count
    }

    pub fn auto_check_limit(&self) -> Option<u32> {
        self.auto_check_limit
    }

    /// Count one automatic check and return the new total.
    pub fn record_auto_check(&mut self) -> u32 {
        self.auto_check_count = self.auto_check_count.saturating_add(1);
        self.auto_check_count
    }

    /// Whether the automatic check budget is used up.
    pub fn auto_checks_exhausted(&self) -> bool {
        self.auto_check_limit
            .is_some_and(|limit| self.auto_check_count >= limit)
    }

    pub fn reset_auto_checks(&mut self) {
        self.auto_check_count = 0;
    }
}
