//! Normalized intelligence report.
//!
//! The analysis service answers with loosely shaped JSON: sections can be
//! missing, nested under alternative keys, or carry unexpected types.
//! [`AnalysisResult::normalize`] maps any JSON document onto the fixed set of
//! report fields using independent extractors, so a malformed field degrades
//! to a placeholder instead of failing the whole report.
//!
//! # Example
//!
//! ```
//! use iminsight::report::AnalysisResult;
//! use serde_json::json;
//!
//! let result = AnalysisResult::normalize(&json!({
//!     "detections": {"summary": {"person": 3, "boat": 2}}
//! }));
//! let summary = result.detection_summary.unwrap();
//! assert_eq!(summary.total, 5);
//! assert_eq!(summary.lines(), vec!["Person: 3", "Boat: 2"]);
//! ```

mod anomaly;
pub mod extract;
mod render;

use serde_json::{json, Value};
use tracing::debug;

pub use anomaly::Anomaly;
pub use render::{ReportSection, REPORT_TITLE};

use extract::{count, field, stringify, text, text_at, truthy_field};

/// Placeholder for a missing caption.
pub const CAPTION_PLACEHOLDER: &str = "—";

/// Placeholder for any other missing value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Caption block; the service may send the block without text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caption {
    pub text: Option<String>,
}

/// Zero-shot classification block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub label: Option<String>,
}

/// One `label: count` entry of the detection summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionCount {
    pub label: String,
    pub count: u64,
}

impl DetectionCount {
    /// Label with its first character upper-cased.
    pub fn display_label(&self) -> String {
        let mut chars = self.label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Per-label detection counts, in payload order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionSummary {
    pub entries: Vec<DetectionCount>,
    pub total: u64,
}

impl DetectionSummary {
    fn from_value(summary: &Value) -> Option<Self> {
        let map = summary.as_object()?;
        let mut entries = Vec::with_capacity(map.len());

        for (label, value) in map {
            match count(value) {
                Some(n) => entries.push(DetectionCount {
                    label: label.clone(),
                    count: n,
                }),
                None => debug!("Skipping non-numeric detection count for '{}'", label),
            }
        }

        let total = entries.iter().map(|e| e.count).sum();
        Some(Self { entries, total })
    }

    /// Rendered `"<Label>: <count>"` lines.
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| format!("{}: {}", e.display_label(), e.count))
            .collect()
    }
}

/// Overall assessment; every field already defaults to `"N/A"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavalAssessment {
    pub status: String,
    pub priority: String,
    pub recommendation: String,
}

impl NavalAssessment {
    fn from_value(value: &Value) -> Self {
        let read = |key: &str| text_at(value, &[key]).unwrap_or_else(|| NOT_AVAILABLE.to_string());
        Self {
            status: read("status"),
            priority: read("priority"),
            recommendation: read("recommendation"),
        }
    }
}

/// Image metadata echoed back by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInfo {
    pub filename: Option<String>,
    pub size: Option<(u64, u64)>,
    pub format: Option<String>,
    pub message: Option<String>,
}

impl FileInfo {
    fn from_value(value: &Value) -> Self {
        let size = field(value, &["size"])
            .and_then(Value::as_array)
            .and_then(|dims| match dims.as_slice() {
                [w, h] => Some((count(w)?, count(h)?)),
                _ => None,
            });

        Self {
            filename: text_at(value, &["filename"]),
            size,
            format: text_at(value, &["format"]),
            message: text_at(value, &["message"]),
        }
    }

    /// One-line description, e.g. `harbour.jpg (1920x1080, JPEG)`.
    pub fn summary(&self) -> Option<String> {
        let mut details = Vec::new();
        if let Some((w, h)) = self.size {
            details.push(format!("{}x{}", w, h));
        }
        if let Some(ref format) = self.format {
            details.push(format.clone());
        }

        match (&self.filename, details.is_empty()) {
            (Some(name), true) => Some(name.clone()),
            (Some(name), false) => Some(format!("{} ({})", name, details.join(", "))),
            (None, false) => Some(details.join(", ")),
            (None, true) => None,
        }
    }
}

/// The normalized report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisResult {
    /// When set, nothing else is rendered.
    pub error: Option<String>,
    pub caption: Option<Caption>,
    pub classification: Option<Classification>,
    pub detection_summary: Option<DetectionSummary>,
    pub anomalies: Vec<Anomaly>,
    /// Count reported by the service, which may differ from `anomalies.len()`.
    pub anomaly_count: Option<u64>,
    pub naval_assessment: Option<NavalAssessment>,
    pub file_info: Option<FileInfo>,
}

impl AnalysisResult {
    /// Map an arbitrary JSON document onto the report fields. Never fails.
    pub fn normalize(payload: &Value) -> Self {
        if let Some(error) = truthy_field(payload, &["error"]) {
            return Self {
                error: Some(text(error).unwrap_or_else(|| stringify(error))),
                ..Default::default()
            };
        }

        let caption = truthy_field(payload, &["caption"]).map(|c| Caption {
            text: text_at(c, &["text"]),
        });

        let classification = truthy_field(payload, &["classification"]).map(|c| Classification {
            label: text_at(c, &["label"]),
        });

        let detection_summary = truthy_field(payload, &["detections", "summary"])
            .and_then(DetectionSummary::from_value);

        let anomalies = resolve_anomalies(payload)
            .map(|items| items.iter().map(Anomaly::from_value).collect())
            .unwrap_or_default();

        let anomaly_count = field(payload, &["anomalies_detected", "count"]).and_then(count);

        let naval_assessment =
            truthy_field(payload, &["naval_assessment"]).map(NavalAssessment::from_value);

        let file_info = truthy_field(payload, &["file_info"])
            .filter(|v| v.is_object())
            .map(FileInfo::from_value);

        Self {
            error: None,
            caption,
            classification,
            detection_summary,
            anomalies,
            anomaly_count,
            naval_assessment,
            file_info,
        }
    }

    /// Report for a failed upload, built from the same error payload shape
    /// the service itself uses.
    pub fn failure(message: &str) -> Self {
        Self::normalize(&json!({ "error": message }))
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Caption text or `"—"`.
    pub fn caption_text(&self) -> &str {
        self.caption
            .as_ref()
            .and_then(|c| c.text.as_deref())
            .unwrap_or(CAPTION_PLACEHOLDER)
    }

    /// Classification label or `"N/A"`.
    pub fn classification_label(&self) -> &str {
        self.classification
            .as_ref()
            .and_then(|c| c.label.as_deref())
            .unwrap_or(NOT_AVAILABLE)
    }

    /// Count shown under the anomaly list.
    pub fn displayed_anomaly_count(&self) -> u64 {
        self.anomaly_count.unwrap_or(self.anomalies.len() as u64)
    }
}

/// Top-level `anomalies`, else `anomalies_detected.anomalies_detected`.
fn resolve_anomalies(payload: &Value) -> Option<&Vec<Value>> {
    field(payload, &["anomalies"])
        .and_then(Value::as_array)
        .or_else(|| {
            field(payload, &["anomalies_detected", "anomalies_detected"]).and_then(Value::as_array)
        })
}
