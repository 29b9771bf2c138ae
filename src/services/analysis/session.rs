//! Analysis request lifecycle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::progress::{ProgressConfig, ProgressTicker};
use super::types::{AnalysisEvent, AnalysisRequestState, SkipReason, SubmitOutcome, FAILURE_MESSAGE};
use crate::intake::SelectedFile;
use crate::report::AnalysisResult;
use crate::upload::AnalysisUploader;

type SharedState = Arc<Mutex<AnalysisRequestState>>;

fn lock_state(state: &SharedState) -> MutexGuard<'_, AnalysisRequestState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the request state of one operator session.
///
/// Clones share the same state, so a front end can observe progress while
/// another task awaits [`submit`](Self::submit). At most one upload is
/// outstanding at a time; extra submits are rejected, not queued.
#[derive(Clone)]
pub struct AnalysisSession {
    uploader: Arc<dyn AnalysisUploader>,
    state: SharedState,
    progress: ProgressConfig,
    events: Option<mpsc::UnboundedSender<AnalysisEvent>>,
}

impl AnalysisSession {
    pub fn new(uploader: Arc<dyn AnalysisUploader>, progress: ProgressConfig) -> Self {
        Self {
            uploader,
            state: Arc::new(Mutex::new(AnalysisRequestState::Idle)),
            progress,
            events: None,
        }
    }

    /// Start receiving events. Replaces any earlier subscriber.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<AnalysisEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    pub fn state(&self) -> AnalysisRequestState {
        lock_state(&self.state).clone()
    }

    pub fn progress(&self) -> u8 {
        lock_state(&self.state).progress()
    }

    pub fn is_in_flight(&self) -> bool {
        lock_state(&self.state).is_in_flight()
    }

    /// Settled report, including the error-only report of a failure.
    pub fn result(&self) -> Option<AnalysisResult> {
        lock_state(&self.state).result()
    }

    /// Upload `file` and wait for the normalized result.
    ///
    /// Does nothing without a file or while another upload is outstanding.
    /// Every failure settles the session in [`AnalysisRequestState::Failed`]
    /// with the fixed [`FAILURE_MESSAGE`]; the cause is only logged.
    pub async fn submit(&self, file: Option<SelectedFile>) -> SubmitOutcome {
        let Some(file) = file else {
            debug!("Submit ignored: {}", SkipReason::NoFileSelected.as_str());
            return SubmitOutcome::Skipped(SkipReason::NoFileSelected);
        };

        {
            let mut state = lock_state(&self.state);
            if state.is_in_flight() {
                debug!("Submit ignored: {}", SkipReason::AlreadyInFlight.as_str());
                return SubmitOutcome::Skipped(SkipReason::AlreadyInFlight);
            }
            *state = AnalysisRequestState::InFlight { progress: 0 };
        }

        info!("Submitting {} for analysis ({} bytes)", file.name(), file.len());
        self.emit(AnalysisEvent::Started {
            file_name: file.name().to_string(),
        });

        let mut guard = InFlightGuard {
            state: self.state.clone(),
            ticker: Some(self.start_ticker()),
            settled: false,
        };

        let response = self.uploader.upload(&file).await;

        // Stop the ticker before the terminal state is written so no tick
        // can land after settlement.
        if let Some(ticker) = guard.ticker.take() {
            ticker.stop().await;
        }

        let (state, outcome, event) = match response {
            Ok(payload) => {
                let result = AnalysisResult::normalize(&payload);
                info!(
                    "Analysis of {} complete ({} anomalies)",
                    file.name(),
                    result.displayed_anomaly_count()
                );
                (
                    AnalysisRequestState::Completed(result.clone()),
                    SubmitOutcome::Completed(result),
                    AnalysisEvent::Completed,
                )
            }
            Err(e) => {
                warn!("Upload of {} failed: {}", file.name(), e);
                (
                    AnalysisRequestState::Failed(FAILURE_MESSAGE.to_string()),
                    SubmitOutcome::Failed(FAILURE_MESSAGE.to_string()),
                    AnalysisEvent::Failed {
                        message: FAILURE_MESSAGE.to_string(),
                    },
                )
            }
        };

        *lock_state(&self.state) = state;
        guard.settled = true;
        drop(guard);
        self.emit(event);
        outcome
    }

    /// Clear a settled result back to idle. Ignored while a request is
    /// outstanding; returns whether anything changed.
    pub fn dismiss(&self) -> bool {
        {
            let mut state = lock_state(&self.state);
            if state.is_in_flight() {
                debug!("Dismiss ignored while a request is in flight");
                return false;
            }
            if *state == AnalysisRequestState::Idle {
                return false;
            }
            *state = AnalysisRequestState::Idle;
        }
        self.emit(AnalysisEvent::Dismissed);
        true
    }

    fn start_ticker(&self) -> ProgressTicker {
        let state = self.state.clone();
        let events = self.events.clone();
        let config = self.progress.clone();

        ProgressTicker::start(&self.progress, move || {
            let mut guard = lock_state(&state);
            let AnalysisRequestState::InFlight { progress } = &mut *guard else {
                return false;
            };

            let next = config.advance(*progress);
            if next != *progress {
                *progress = next;
                drop(guard);
                if let Some(ref tx) = events {
                    let _ = tx.send(AnalysisEvent::Progress { percent: next });
                }
            }
            true
        })
    }

    fn emit(&self, event: AnalysisEvent) {
        if let Some(ref tx) = self.events {
            let _ = tx.send(event);
        }
    }
}

/// Cleans up if a `submit` future is dropped before the request settles:
/// the ticker is aborted and the session does not stay stuck in flight.
struct InFlightGuard {
    state: SharedState,
    ticker: Option<ProgressTicker>,
    settled: bool,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        drop(self.ticker.take());
        if self.settled {
            return;
        }
        let mut state = lock_state(&self.state);
        if state.is_in_flight() {
            warn!("Analysis abandoned before the service answered");
            *state = AnalysisRequestState::Failed(FAILURE_MESSAGE.to_string());
        }
    }
}
