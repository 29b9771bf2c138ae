//! Shared helper functions for CLI commands.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use iminsight::intake::{FileIntake, SelectedFile};
use iminsight::report::{AnalysisResult, REPORT_TITLE};
use iminsight::services::{AnalysisEvent, SkipReason};

/// Progress bar for one analysis, 0..=100.
pub fn analysis_progress_bar(file_name: &str) -> ProgressBar {
    let bar = ProgressBar::new(100);
    let template = ProgressStyle::with_template(
        "{spinner:.cyan} {msg} [{bar:40.cyan/blue}] {pos:>3}%",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ");
    bar.set_style(template);
    bar.set_message(format!("Analyzing {}", truncate(file_name, 32)));
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Reflect a session event on the progress bar.
pub fn apply_event(bar: &ProgressBar, event: &AnalysisEvent) {
    match event {
        AnalysisEvent::Started { .. } => bar.set_position(0),
        AnalysisEvent::Progress { percent } => bar.set_position(u64::from(*percent)),
        AnalysisEvent::Completed | AnalysisEvent::Failed { .. } => {
            bar.set_position(100);
        }
        AnalysisEvent::Dismissed => {}
    }
}

/// Print the mission log for a report.
pub fn print_report(result: &AnalysisResult) {
    println!("\n{}", style(REPORT_TITLE).bold());
    println!("{}", "-".repeat(REPORT_TITLE.chars().count()));

    for section in result.sections() {
        if result.is_error() {
            for line in &section.lines {
                println!("{} {}", style("✗").red(), style(line).red());
            }
            continue;
        }

        println!("\n{}", style(section.title).cyan().bold());
        for line in &section.lines {
            println!("  {}", line);
        }
    }

    if !result.is_error() && result.sections().is_empty() {
        println!("{} The service returned no report sections.", style("!").yellow());
    }
}

/// Describe the current selection and preview.
pub fn print_selection(intake: &FileIntake) {
    let Some(file) = intake.selected() else {
        println!("{} No image selected", style("!").yellow());
        return;
    };

    println!(
        "{} {} ({}, {})",
        style("✓").green(),
        file.name(),
        format_size(file),
        file.format().as_str()
    );

    if let Some(preview) = intake.preview() {
        println!("  Preview: {} at {}", preview.url(), intake.zoom());
    } else if let Some(placeholder) = intake.geo_placeholder() {
        println!("  {}", style(placeholder).dim());
    } else {
        println!("  {}", style("No preview").dim());
    }
}

pub fn print_skipped(reason: SkipReason) {
    println!("{} Nothing to do: {}", style("!").yellow(), reason.as_str());
}

fn format_size(file: &SelectedFile) -> String {
    let bytes = file.len() as f64;
    if bytes >= 1024.0 * 1024.0 {
        format!("{:.1} MiB", bytes / (1024.0 * 1024.0))
    } else if bytes >= 1024.0 {
        format!("{:.1} KiB", bytes / 1024.0)
    } else {
        format!("{} B", file.len())
    }
}

/// Truncate a string to `max` characters, adding an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short.png", 32), "short.png");
        assert_eq!(truncate("a-very-long-file-name.png", 10), "a-very-lo…");
        assert_eq!(truncate("", 3), "");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(&SelectedFile::new("a.png", vec![0u8; 12])), "12 B");
        assert_eq!(format_size(&SelectedFile::new("a.png", vec![0u8; 2048])), "2.0 KiB");
        assert_eq!(
            format_size(&SelectedFile::new("a.png", vec![0u8; 3 * 1024 * 1024])),
            "3.0 MiB"
        );
    }

    #[test]
    fn test_apply_event_tracks_progress() {
        let bar = ProgressBar::hidden();
        bar.set_length(100);
        apply_event(&bar, &AnalysisEvent::Progress { percent: 40 });
        assert_eq!(bar.position(), 40);
        apply_event(
            &bar,
            &AnalysisEvent::Failed {
                message: "x".to_string(),
            },
        );
        assert_eq!(bar.position(), 100);
    }
}
