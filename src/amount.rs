//! Parsing of monetary amounts sent by clients.
//!
//! Clients may send amounts either as JSON numbers or as strings containing a
//! number, e.g. `5`, `5.25` or `"5.25"`.

use serde_json::Value;

/// Parse a monetary amount from a JSON value.
///
/// Returns `None` if `value` is not a number or a string containing a number,
/// or if the number is not finite (e.g., "NaN" or "inf").
pub fn parse_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    amount.is_finite().then_some(amount)
}

/// Parse a monetary amount that must be strictly greater than zero.
///
/// Transaction values are stored as magnitudes, the direction of the money is
/// given by the transaction type.
pub fn parse_positive_amount(value: &Value) -> Option<f64> {
    parse_amount(value).filter(|amount| *amount > 0.0)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{parse_amount, parse_positive_amount};

    #[test]
    fn parses_numbers() {
        assert_eq!(parse_amount(&json!(5)), Some(5.0));
        assert_eq!(parse_amount(&json!(-12.5)), Some(-12.5));
        assert_eq!(parse_amount(&json!(0)), Some(0.0));
    }

    #[test]
    fn parses_numeric_strings() {
        assert_eq!(parse_amount(&json!("5")), Some(5.0));
        assert_eq!(parse_amount(&json!(" 42.25 ")), Some(42.25));
    }

    #[test]
    fn rejects_non_numbers() {
        assert_eq!(parse_amount(&json!("five")), None);
        assert_eq!(parse_amount(&json!("")), None);
        assert_eq!(parse_amount(&json!(null)), None);
        assert_eq!(parse_amount(&json!(true)), None);
        assert_eq!(parse_amount(&json!([1])), None);
        assert_eq!(parse_amount(&json!({ "value": 1 })), None);
    }

    #[test]
    fn rejects_non_finite_strings() {
        assert_eq!(parse_amount(&json!("NaN")), None);
        assert_eq!(parse_amount(&json!("inf")), None);
        assert_eq!(parse_amount(&json!("-infinity")), None);
    }

    #[test]
    fn positive_amount_rejects_zero_and_negative() {
        assert_eq!(parse_positive_amount(&json!(0)), None);
        assert_eq!(parse_positive_amount(&json!("0.0")), None);
        assert_eq!(parse_positive_amount(&json!(-1)), None);
        assert_eq!(parse_positive_amount(&json!(0.01)), Some(0.01));
    }
}
