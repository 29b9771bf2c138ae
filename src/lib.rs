//! IMInsight: naval image intelligence client.
//!
//! Select one image, send it to the remote analysis service and read back a
//! normalized intelligence report.
//!
//! - [`intake`]: file selection, format classification, preview handles, zoom
//! - [`services`]: the analysis session (upload, simulated progress, result)
//! - [`upload`]: the HTTP transport to the service
//! - [`report`]: normalization of the service's loosely shaped JSON
//! - [`config`]: settings and configuration loading

pub mod config;
pub mod intake;
pub mod report;
pub mod services;
pub mod upload;

pub use config::Settings;
pub use intake::{FileIntake, FormatClass, SelectedFile};
pub use report::AnalysisResult;
pub use services::{AnalysisSession, OperatorSession};
