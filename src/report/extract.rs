//! Optional-field extractors over untyped JSON.
//!
//! Every extractor answers `None` (or a neutral value) instead of failing, so
//! one missing or mistyped field never affects its neighbours.

use serde_json::{Number, Value};

/// Walk nested objects by key. Any missing key or non-object step yields `None`.
pub fn field<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, key| current.as_object()?.get(*key))
}

/// Like [`field`], but only returns values that are truthy.
pub fn truthy_field<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    field(value, path).filter(|v| is_truthy(v))
}

/// Loose truthiness: null, false, zero and the empty string are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Displayable text for a truthy scalar. Containers and falsy values give `None`.
pub fn text(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Shortest decimal form of a number; integral floats print without `.0`.
pub fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() => f.to_string(),
        _ => n.to_string(),
    }
}

/// Text at a nested path, if present and displayable.
pub fn text_at(value: &Value, path: &[&str]) -> Option<String> {
    field(value, path).and_then(text)
}

/// Generic string conversion used when nothing better is known.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => stringify(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => compact_json(value),
    }
}

/// Compact JSON form of a value.
pub fn compact_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Non-negative whole count, accepting integral floats.
pub fn count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
        .map(|f| f as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_walks_objects_only() {
        let doc = json!({"a": {"b": {"c": 1}}, "list": [1, 2]});
        assert_eq!(field(&doc, &["a", "b", "c"]), Some(&json!(1)));
        assert_eq!(field(&doc, &["a", "x"]), None);
        assert_eq!(field(&doc, &["list", "0"]), None);
        assert_eq!(field(&json!("scalar"), &["a"]), None);
        assert_eq!(field(&doc, &[]), Some(&doc));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(0.5)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_text_of_scalars() {
        assert_eq!(text(&json!("a boat")), Some("a boat".to_string()));
        assert_eq!(text(&json!(42)), Some("42".to_string()));
        assert_eq!(text(&json!(true)), Some("true".to_string()));
        assert_eq!(text(&json!("")), None);
        assert_eq!(text(&json!({"x": 1})), None);
    }

    #[test]
    fn test_number_text_drops_integral_fraction() {
        assert_eq!(stringify(&json!(2.0)), "2");
        assert_eq!(stringify(&json!(-3.0)), "-3");
        assert_eq!(stringify(&json!(0.25)), "0.25");
        assert_eq!(stringify(&json!(7)), "7");
        assert_eq!(text(&json!(12.0)), Some("12".to_string()));
        assert_eq!(stringify(&json!([1.0, 2.5])), "1,2.5");
    }

    #[test]
    fn test_stringify() {
        assert_eq!(stringify(&json!(null)), "null");
        assert_eq!(stringify(&json!(7)), "7");
        assert_eq!(stringify(&json!([1, "a", null, [2, 3]])), "1,a,,2,3");
        assert_eq!(stringify(&json!({"type": "x", "n": 1})), r#"{"type":"x","n":1}"#);
    }

    #[test]
    fn test_count() {
        assert_eq!(count(&json!(3)), Some(3));
        assert_eq!(count(&json!(3.0)), Some(3));
        assert_eq!(count(&json!(2.5)), None);
        assert_eq!(count(&json!(-1)), None);
        assert_eq!(count(&json!("3")), None);
    }
}
