//! Forgiving deserializers for form-style numeric input.
//!
//! Browser forms post whatever the user typed: numbers, numeric strings,
//! empty strings or nothing at all. These helpers coerce such values instead
//! of rejecting the request. Missing, `null` and unparseable values become
//! zero, `false` or the empty string.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize any JSON value into an `f64`.
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(to_number).unwrap_or(0.0))
}

/// Deserialize any JSON value into a `bool`.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(to_flag).unwrap_or(false))
}

/// Deserialize any JSON value into an `i64`, truncating fractions.
pub fn integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(to_integer).unwrap_or(0))
}

/// Deserialize a JSON scalar into a `String`.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(to_text).unwrap_or_default())
}

/// Coerce a JSON value into a finite number.
pub fn to_number(value: &Value) -> f64 {
    let number = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };

    if number.is_finite() {
        number
    } else {
        0.0
    }
}

/// Coerce a JSON value into a boolean.
pub fn to_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
        Value::Null => false,
    }
}

/// Coerce a JSON value into an integer.
pub fn to_integer(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or_else(|| to_number(value).trunc() as i64),
        _ => to_number(value).trunc() as i64,
    }
}

/// Coerce a JSON scalar into text. Arrays and objects become empty.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "number")]
        amount: f64,
        #[serde(default, deserialize_with = "flag")]
        cash: bool,
    }

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(&json!(12.5)), 12.5);
        assert_eq!(to_number(&json!(" 7 ")), 7.0);
        assert_eq!(to_number(&json!("")), 0.0);
        assert_eq!(to_number(&json!("abc")), 0.0);
        assert_eq!(to_number(&json!("inf")), 0.0);
        assert_eq!(to_number(&json!(true)), 1.0);
        assert_eq!(to_number(&json!(null)), 0.0);
        assert_eq!(to_number(&json!([1, 2])), 0.0);
    }

    #[test]
    fn test_to_integer() {
        assert_eq!(to_integer(&json!(42)), 42);
        assert_eq!(to_integer(&json!(3.9)), 3);
        assert_eq!(to_integer(&json!("17")), 17);
        assert_eq!(to_integer(&json!(null)), 0);
        assert_eq!(to_integer(&json!("x")), 0);
    }

    #[test]
    fn test_to_text() {
        assert_eq!(to_text(&json!("08012345678")), "08012345678");
        assert_eq!(to_text(&json!(12)), "12");
        assert_eq!(to_text(&json!(null)), "");
        assert_eq!(to_text(&json!({"a": 1})), "");
    }

    #[test]
    fn test_to_flag() {
        assert!(to_flag(&json!(true)));
        assert!(to_flag(&json!(1)));
        assert!(to_flag(&json!("yes")));
        assert!(!to_flag(&json!("0")));
        assert!(!to_flag(&json!("")));
        assert!(!to_flag(&json!(0)));
        assert!(!to_flag(&json!(null)));
    }

    #[test]
    fn test_form_fields() {
        let form: Form = serde_json::from_value(json!({"amount": "1500", "cash": 1})).unwrap();
        assert_eq!(form.amount, 1500.0);
        assert!(form.cash);

        let form: Form = serde_json::from_value(json!({"amount": null})).unwrap();
        assert_eq!(form.amount, 0.0);
        assert!(!form.cash);

        let form: Form = serde_json::from_value(json!({})).unwrap();
        assert_eq!(form.amount, 0.0);
    }
}
