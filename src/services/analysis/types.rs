//! Analysis session state, outcomes and events.

use crate::report::AnalysisResult;

/// Message shown for every upload or analysis failure, whatever the cause.
pub const FAILURE_MESSAGE: &str = "Upload/analysis failed.";

/// Request lifecycle of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnalysisRequestState {
    #[default]
    Idle,
    /// Upload outstanding; `progress` is simulated and stays below 100.
    InFlight { progress: u8 },
    Completed(AnalysisResult),
    Failed(String),
}

impl AnalysisRequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisRequestState::Idle => "idle",
            AnalysisRequestState::InFlight { .. } => "in_flight",
            AnalysisRequestState::Completed(_) => "completed",
            AnalysisRequestState::Failed(_) => "failed",
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, AnalysisRequestState::InFlight { .. })
    }

    /// Displayed progress: 0 when idle, 100 once settled.
    pub fn progress(&self) -> u8 {
        match self {
            AnalysisRequestState::Idle => 0,
            AnalysisRequestState::InFlight { progress } => *progress,
            AnalysisRequestState::Completed(_) | AnalysisRequestState::Failed(_) => 100,
        }
    }

    /// Report to display, if the request has settled.
    pub fn result(&self) -> Option<AnalysisResult> {
        match self {
            AnalysisRequestState::Completed(result) => Some(result.clone()),
            AnalysisRequestState::Failed(message) => Some(AnalysisResult::failure(message)),
            _ => None,
        }
    }
}

/// Why a submit did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoFileSelected,
    AlreadyInFlight,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NoFileSelected => "no file selected",
            SkipReason::AlreadyInFlight => "an analysis is already running",
        }
    }
}

/// Result of one `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Completed(AnalysisResult),
    Failed(String),
    Skipped(SkipReason),
}

/// Events emitted by a session for front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisEvent {
    /// Upload started
    Started { file_name: String },
    /// Simulated progress changed
    Progress { percent: u8 },
    /// Response received and normalized
    Completed,
    /// Upload or parsing failed
    Failed { message: String },
    /// Result cleared, back to idle
    Dismissed,
}
