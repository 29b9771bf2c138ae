//! Service layer for IMInsight business logic.
//!
//! This module contains the session logic separated from UI concerns.
//! Services can be driven by the CLI, an interactive console, or tests.

pub mod analysis;
pub mod operator;

pub use analysis::{
    AnalysisEvent, AnalysisRequestState, AnalysisSession, ProgressConfig, SkipReason,
    SubmitOutcome, FAILURE_MESSAGE,
};
pub use operator::OperatorSession;
