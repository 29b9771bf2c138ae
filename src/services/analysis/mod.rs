//! Analysis service: upload a selected file and track the request.
//!
//! The request runs as two clocks. The upload itself is authoritative; a
//! [`ProgressConfig`]-driven ticker task only animates the progress value and
//! is cancelled the moment the upload settles, whichever way it settles.

mod progress;
mod session;
mod types;

pub use progress::ProgressConfig;
pub use session::AnalysisSession;
pub use types::{AnalysisEvent, AnalysisRequestState, SkipReason, SubmitOutcome, FAILURE_MESSAGE};
