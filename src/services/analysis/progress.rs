//! Simulated upload progress.
//!
//! The service gives no transfer feedback, so progress is a timer: a fixed
//! step on a fixed interval, capped below 100 until the request settles.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Shape of the simulated progress curve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressConfig {
    /// Percent added per tick.
    pub step: u8,
    /// Time between ticks.
    pub interval: Duration,
    /// Highest value reached while the request is outstanding.
    pub ceiling: u8,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            step: 10,
            interval: Duration::from_millis(300),
            ceiling: 90,
        }
    }
}

impl ProgressConfig {
    /// Value after one tick from `current`.
    pub fn advance(&self, current: u8) -> u8 {
        if current >= self.ceiling {
            current
        } else {
            current.saturating_add(self.step).min(self.ceiling)
        }
    }
}

/// Periodic tick task. Aborted on drop; [`stop`](Self::stop) also waits for it.
pub(crate) struct ProgressTicker {
    handle: Option<JoinHandle<()>>,
}

impl ProgressTicker {
    /// Spawn a task calling `on_tick` every interval until it returns `false`.
    /// The first tick fires one interval after start.
    pub fn start<F>(config: &ProgressConfig, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let period = config.interval.max(Duration::from_millis(1));

        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if !on_tick() {
                    break;
                }
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    /// Cancel the task and wait until it can no longer run.
    pub async fn stop(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
