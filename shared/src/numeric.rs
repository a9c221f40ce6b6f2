//! Loose numeric coercion for catalog fields
//!
//! Neither catalog is strict about numeric types: quantities arrive as `7`,
//! `"7"`, `"7.00"` or `null` depending on the record. Values are compared as
//! exact decimals, so `"10"` and `10` are equal and no float epsilon is involved.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;
use std::str::FromStr;

/// Coerce a JSON field into a decimal.
///
/// - numbers and numeric strings (trimmed, plain or scientific) parse exactly
/// - empty strings and `null` are zero
/// - booleans are zero or one
/// - absent fields, arrays, objects and non-numeric strings are not a number (`None`)
pub fn numeric(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Null => Some(Decimal::ZERO),
        Value::Bool(b) => Some(if *b { Decimal::ONE } else { Decimal::ZERO }),
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Some(Decimal::ZERO)
            } else {
                parse_decimal(s)
            }
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Render a decimal as a JSON number, integral values without a fraction
pub fn to_json_number(value: Decimal) -> Value {
    let value = value.normalize();
    if value.scale() == 0
        && let Some(i) = value.to_i64()
    {
        return Value::from(i);
    }
    value
        .to_f64()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
