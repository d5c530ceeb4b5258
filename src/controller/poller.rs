//! Periodic status checks.

use super::core::WeakController;
use crate::config::PollPolicy;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Owns the status timer task. Dropping the handle cancels the timer.
pub struct PollerHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn cancel(self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Start the timer. The first tick fires one full interval from now.
///
/// The task holds only a weak reference, so it never keeps the controller alive.
pub(crate) fn spawn(controller: WeakController, policy: PollPolicy) -> PollerHandle {
    let token = CancellationToken::new();
    let cancelled = token.clone();
    let period = policy.interval();

    let task = tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    debug!("status timer cancelled");
                    break;
                }
                _ = ticker.tick() => {}
            }

            let Some(client) = controller.upgrade() else {
                break;
            };
            if !client.poll_tick() {
                debug!("status timer finished");
                break;
            }
        }
    });

    PollerHandle { token, task }
}
