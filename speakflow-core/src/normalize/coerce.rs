//! Best-effort conversion of untyped JSON values.
//!
//! These helpers only classify; they never fail. `None` means "absent" so the
//! caller can keep trying other candidate locations.

use serde_json::Value;

/// Convert a JSON value to a finite number.
///
/// Numbers and numeric strings (surrounding whitespace allowed) are accepted.
/// Everything else, including `NaN`/`inf` spellings, is absent.
pub fn to_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// [`to_number`] rounded to the nearest integer.
pub fn to_integer(value: &Value) -> Option<i64> {
    to_number(value).map(round_to_i64)
}

/// Round half away from zero, saturating at the `i64` bounds.
pub fn round_to_i64(n: f64) -> i64 {
    // `as` saturates for out-of-range floats
    n.round() as i64
}

/// Convert a value to a list of display strings.
///
/// A single string becomes a one-element list, arrays keep their non-null
/// items (non-string items are rendered as JSON), anything else is absent.
pub fn to_string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(s) => Some(vec![s.clone()]),
        Value::Array(items) => Some(
            items
                .iter()
                .filter(|item| !item.is_null())
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(to_number(&json!(42)), Some(42.0));
        assert_eq!(to_number(&json!(-1.5)), Some(-1.5));
        assert_eq!(to_number(&json!(0)), Some(0.0));
    }

    #[test]
    fn test_numeric_strings_are_parsed() {
        assert_eq!(to_number(&json!("148")), Some(148.0));
        assert_eq!(to_number(&json!(" 2.25 ")), Some(2.25));
        assert_eq!(to_number(&json!("1e2")), Some(100.0));
    }

    #[test]
    fn test_non_numeric_values_are_absent() {
        assert_eq!(to_number(&json!(null)), None);
        assert_eq!(to_number(&json!(true)), None);
        assert_eq!(to_number(&json!("")), None);
        assert_eq!(to_number(&json!("fast")), None);
        assert_eq!(to_number(&json!([1])), None);
        assert_eq!(to_number(&json!({"wpm": 1})), None);
    }

    #[test]
    fn test_non_finite_strings_are_absent() {
        assert_eq!(to_number(&json!("NaN")), None);
        assert_eq!(to_number(&json!("inf")), None);
        assert_eq!(to_number(&json!("-infinity")), None);
    }

    #[test]
    fn test_to_integer_rounds() {
        assert_eq!(to_integer(&json!(124.5)), Some(125));
        assert_eq!(to_integer(&json!("124.4")), Some(124));
        assert_eq!(to_integer(&json!(-0.4)), Some(0));
        assert_eq!(to_integer(&json!(1e300)), Some(i64::MAX));
    }

    #[test]
    fn test_string_lists() {
        assert_eq!(
            to_string_list(&json!("one line")),
            Some(vec!["one line".to_string()])
        );
        assert_eq!(
            to_string_list(&json!(["a", null, 3])),
            Some(vec!["a".to_string(), "3".to_string()])
        );
        assert_eq!(to_string_list(&json!(7)), None);
        assert_eq!(to_string_list(&json!(null)), None);
    }
}
