//! One-shot analysis command.

use std::path::Path;

use anyhow::Context;
use console::style;
use tokio::sync::mpsc::UnboundedReceiver;

use iminsight::config::Settings;
use iminsight::intake::IntakeError;
use iminsight::report::AnalysisResult;
use iminsight::services::{AnalysisEvent, OperatorSession, SubmitOutcome};

use crate::cli::helpers::{analysis_progress_bar, apply_event, print_report, print_selection, print_skipped};

/// Upload a single image and print its report.
pub async fn cmd_analyze(settings: &Settings, path: &Path) -> anyhow::Result<()> {
    let mut session = OperatorSession::from_settings(settings)
        .with_context(|| format!("Cannot reach analysis service at {}", settings.server_url))?;
    let mut events = session.subscribe();

    let selection = session.select_path(path).await.map(|_| ());
    match selection {
        Ok(()) => print_selection(session.intake()),
        Err(e @ IntakeError::UnsupportedFormat { .. }) => {
            println!("{} {}", style("!").yellow(), e.user_message());
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to select image"),
    }

    let outcome = run_with_progress(&session, &mut events).await;
    report_outcome(outcome);
    Ok(())
}

/// Submit the current selection, animating a progress bar from session events.
pub async fn run_with_progress(
    session: &OperatorSession,
    events: &mut UnboundedReceiver<AnalysisEvent>,
) -> SubmitOutcome {
    let name = session
        .selected()
        .map(|f| f.name().to_string())
        .unwrap_or_default();
    let bar = analysis_progress_bar(&name);

    let submit = session.submit();
    tokio::pin!(submit);

    let outcome = loop {
        tokio::select! {
            outcome = &mut submit => break outcome,
            Some(event) = events.recv() => apply_event(&bar, &event),
        }
    };

    // Settlement events may still be queued
    while let Ok(event) = events.try_recv() {
        apply_event(&bar, &event);
    }
    bar.finish_and_clear();
    outcome
}

pub fn report_outcome(outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Completed(result) => print_report(&result),
        SubmitOutcome::Failed(message) => print_report(&AnalysisResult::failure(&message)),
        SubmitOutcome::Skipped(reason) => print_skipped(reason),
    }
}
