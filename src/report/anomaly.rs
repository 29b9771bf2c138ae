//! Anomaly entries of an analysis report.

use std::fmt;

use serde_json::Value;

use super::extract::{compact_json, field, stringify, text, truthy_field};

/// One flagged item. The service sends either free text or a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    PlainText(String),
    Structured {
        description: Option<String>,
        person_count: Option<String>,
        severity: Option<String>,
        /// Compact JSON of the record, shown when there is no description.
        raw: String,
    },
    /// Any other scalar, already converted to text.
    Other(String),
}

impl Anomaly {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Anomaly::PlainText(s.clone()),
            // Arrays carry no fields and render as their JSON
            Value::Object(_) | Value::Array(_) => Anomaly::Structured {
                description: field(value, &["description"]).and_then(text),
                person_count: field(value, &["person_count"]).map(stringify),
                severity: truthy_field(value, &["severity"]).map(stringify),
                raw: compact_json(value),
            },
            other => Anomaly::Other(stringify(other)),
        }
    }

    /// Render as a single report line.
    pub fn render(&self) -> String {
        match self {
            Anomaly::PlainText(text) => text.clone(),
            Anomaly::Structured {
                description,
                person_count,
                severity,
                raw,
            } => {
                let mut line = description.clone().unwrap_or_else(|| raw.clone());
                if let Some(persons) = person_count {
                    line.push_str(&format!(" (Persons: {})", persons));
                }
                if let Some(severity) = severity {
                    line.push_str(&format!(" [Severity: {}]", severity));
                }
                line
            }
            Anomaly::Other(text) => text.clone(),
        }
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_text() {
        let anomaly = Anomaly::from_value(&json!("overloaded boat"));
        assert_eq!(anomaly, Anomaly::PlainText("overloaded boat".to_string()));
        assert_eq!(anomaly.render(), "overloaded boat");
    }

    #[test]
    fn test_structured_with_severity() {
        let anomaly = Anomaly::from_value(&json!({
            "description": "object in water",
            "severity": "high"
        }));
        assert_eq!(anomaly.render(), "object in water [Severity: high]");
    }

    #[test]
    fn test_structured_with_persons_and_severity() {
        let anomaly = Anomaly::from_value(&json!({
            "type": "person_count_threshold",
            "description": "High human presence",
            "person_count": 12,
            "severity": "medium"
        }));
        assert_eq!(
            anomaly.render(),
            "High human presence (Persons: 12) [Severity: medium]"
        );
    }

    #[test]
    fn test_zero_persons_still_shown() {
        let anomaly = Anomaly::from_value(&json!({"description": "raft", "person_count": 0}));
        assert_eq!(anomaly.render(), "raft (Persons: 0)");
    }

    #[test]
    fn test_structured_without_description_falls_back_to_json() {
        let anomaly = Anomaly::from_value(&json!({"type": "warship_detected", "severity": "high"}));
        assert_eq!(
            anomaly.render(),
            r#"{"type":"warship_detected","severity":"high"} [Severity: high]"#
        );

        let empty = Anomaly::from_value(&json!({"description": ""}));
        assert_eq!(empty.render(), r#"{"description":""}"#);
    }

    #[test]
    fn test_empty_severity_is_omitted() {
        let anomaly = Anomaly::from_value(&json!({"description": "drone", "severity": ""}));
        assert_eq!(anomaly.render(), "drone");
    }

    #[test]
    fn test_other_element_types() {
        assert_eq!(Anomaly::from_value(&json!(3)).render(), "3");
        assert_eq!(Anomaly::from_value(&json!(null)).render(), "null");
        assert_eq!(Anomaly::from_value(&json!(false)).render(), "false");
    }

    #[test]
    fn test_array_element_renders_as_json() {
        let anomaly = Anomaly::from_value(&json!([1, 2]));
        assert!(matches!(
            anomaly,
            Anomaly::Structured { description: None, person_count: None, severity: None, .. }
        ));
        assert_eq!(anomaly.render(), "[1,2]");
        assert_eq!(Anomaly::from_value(&json!([])).render(), "[]");
    }

    #[test]
    fn test_null_person_count_is_shown() {
        let anomaly = Anomaly::from_value(&json!({"description": "raft", "person_count": null}));
        assert_eq!(anomaly.render(), "raft (Persons: null)");
    }

    #[test]
    fn test_integral_float_person_count_prints_whole() {
        let anomaly = Anomaly::from_value(&json!({"description": "raft", "person_count": 2.0}));
        assert_eq!(anomaly.render(), "raft (Persons: 2)");
        let anomaly = Anomaly::from_value(&json!({"description": "raft", "person_count": 2.5}));
        assert_eq!(anomaly.render(), "raft (Persons: 2.5)");
    }
}
