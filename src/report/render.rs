//! Text layout of the mission log.

use std::fmt;

use super::AnalysisResult;

pub const REPORT_TITLE: &str = "Mission Log: Intelligence Report";

/// A titled block of report lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub title: &'static str,
    pub lines: Vec<String>,
}

impl ReportSection {
    fn new(title: &'static str, lines: Vec<String>) -> Self {
        Self { title, lines }
    }
}

impl AnalysisResult {
    /// Sections to display, in order. An error report has exactly one.
    pub fn sections(&self) -> Vec<ReportSection> {
        if let Some(ref error) = self.error {
            return vec![ReportSection::new("Error", vec![error.clone()])];
        }

        let mut sections = Vec::new();

        if let Some(source) = self.file_info.as_ref().and_then(|f| f.summary()) {
            sections.push(ReportSection::new("Source", vec![source]));
        }

        if self.caption.is_some() || self.classification.is_some() {
            sections.push(ReportSection::new(
                "Caption & Classification",
                vec![
                    format!("Caption: {}", self.caption_text()),
                    format!("Classification: {}", self.classification_label()),
                ],
            ));
        }

        if let Some(ref summary) = self.detection_summary {
            let mut lines = summary.lines();
            lines.push(format!("Total: {}", summary.total));
            sections.push(ReportSection::new("Detection Summary", lines));
        }

        if !self.anomalies.is_empty() {
            let mut lines: Vec<String> = self.anomalies.iter().map(|a| a.render()).collect();
            lines.push(format!("Count: {}", self.displayed_anomaly_count()));
            sections.push(ReportSection::new("Anomalies", lines));
        }

        if let Some(ref naval) = self.naval_assessment {
            sections.push(ReportSection::new(
                "Naval Assessment",
                vec![
                    format!("Status: {}", naval.status),
                    format!("Priority: {}", naval.priority),
                    format!("Recommendation: {}", naval.recommendation),
                ],
            ));
        }

        sections
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", REPORT_TITLE)?;
        for section in self.sections() {
            writeln!(f)?;
            writeln!(f, "{}:", section.title)?;
            for line in &section.lines {
                writeln!(f, "  {}", line)?;
            }
        }
        Ok(())
    }
}
