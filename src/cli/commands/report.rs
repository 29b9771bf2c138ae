//! Render a saved analysis response.

use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use iminsight::report::AnalysisResult;

use crate::cli::helpers::print_report;

/// Normalize and print a response document saved from the service.
pub async fn cmd_report(path: &Path) -> anyhow::Result<()> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let payload: Value = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON document", path.display()))?;

    print_report(&AnalysisResult::normalize(&payload));
    Ok(())
}
