//! Background refresh of the forecast feed
//!
//! Refreshes on a fixed interval and whenever the host reports that the
//! window regained focus or the network came back. Each trigger runs
//! [`ForecastFeed::refresh`], so overlapping triggers collapse into one
//! request.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::feed::{FeedOutcome, ForecastFeed, WeatherSource};

/// Default refresh interval (10 minutes)
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Why a refresh was started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    Interval,
    Focus,
    Reconnect,
    Manual,
}

#[derive(Debug, Clone, Copy)]
pub struct RefreshScheduler {
    interval: Duration,
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_INTERVAL)
    }
}

impl RefreshScheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start the background task. It runs until `token` is cancelled or
    /// [`RefreshHandle::stop`] is called.
    pub fn spawn<S: WeatherSource>(
        self,
        feed: Arc<ForecastFeed<S>>,
        token: CancellationToken,
    ) -> RefreshHandle {
        let (triggers, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(self.interval, feed, rx, token.clone()));

        tracing::info!(interval = ?self.interval, "Refresh scheduler started");
        RefreshHandle {
            triggers,
            token,
            task,
        }
    }
}

async fn run<S: WeatherSource>(
    interval: Duration,
    feed: Arc<ForecastFeed<S>>,
    mut triggers: mpsc::UnboundedReceiver<RefreshTrigger>,
    token: CancellationToken,
) {
    let tracker = TaskTracker::new();
    // First tick one full interval from now
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let trigger = tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => RefreshTrigger::Interval,
            Some(trigger) = triggers.recv() => trigger,
        };

        let feed = feed.clone();
        let token = token.clone();
        tracker.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                outcome = feed.refresh() => match outcome {
                    Ok(FeedOutcome::Applied(update)) => {
                        tracing::debug!(?trigger, generation = update.generation, "Forecast refreshed");
                    }
                    Ok(outcome) => tracing::debug!(?trigger, ?outcome, "Refresh not applied"),
                    Err(e) => tracing::warn!(?trigger, "Refresh failed: {}", e),
                },
            }
        });
    }

    tracker.close();
    tracker.wait().await;
    tracing::info!("Refresh scheduler stopped");
}

/// Control handle for a running [`RefreshScheduler`]
pub struct RefreshHandle {
    triggers: mpsc::UnboundedSender<RefreshTrigger>,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// The dashboard window regained focus
    pub fn notify_focus(&self) {
        self.trigger(RefreshTrigger::Focus);
    }

    /// Network connectivity came back
    pub fn notify_reconnect(&self) {
        self.trigger(RefreshTrigger::Reconnect);
    }

    pub fn refresh_now(&self) {
        self.trigger(RefreshTrigger::Manual);
    }

    fn trigger(&self, trigger: RefreshTrigger) {
        if self.triggers.send(trigger).is_err() {
            tracing::debug!(?trigger, "Refresh scheduler is not running");
        }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Cancel the scheduler and any refresh in flight, then wait for it
    pub async fn stop(self) {
        self.token.cancel();
        if let Err(e) = self.task.await {
            tracing::warn!("Refresh scheduler task failed: {}", e);
        }
    }
}
