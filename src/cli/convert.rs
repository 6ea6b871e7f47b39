//! JSON <-> Value conversion utilities

use super::CliError;
use crate::{Bindings, Value};

/// Convert serde_json::Value to Value. Objects have no counterpart and are
/// rejected.
pub fn json_to_value(v: serde_json::Value) -> Result<Value, CliError> {
    Ok(match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Array(
            arr.into_iter()
                .map(json_to_value)
                .collect::<Result<_, _>>()?,
        ),
        serde_json::Value::Object(_) => return Err(CliError::UnsupportedJson("object")),
    })
}

/// Convert Value to serde_json::Value
///
/// Integral numbers are written without a fractional part. Values JSON
/// cannot represent (non-finite numbers, opaque host values, expressions)
/// become `null`.
pub fn value_to_json(v: Value) -> serde_json::Value {
    const LIMIT: f64 = 9_007_199_254_740_992.0; // 2^53

    match v.widen() {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(b),
        Value::Number(n) if n.fract() == 0.0 && n.abs() <= LIMIT => {
            serde_json::Value::Number((n as i64).into())
        }
        Value::Number(n) => serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s),
        Value::Array(arr) => serde_json::Value::Array(arr.into_iter().map(value_to_json).collect()),
        Value::Integer(_) | Value::Float32(_) | Value::Opaque(_) | Value::Expr(_) => {
            serde_json::Value::Null
        }
    }
}

/// Parse a JSON object of variable bindings.
pub fn bindings_from_json(json: &str) -> Result<Bindings, CliError> {
    match serde_json::from_str::<serde_json::Value>(json)? {
        serde_json::Value::Object(obj) => obj
            .into_iter()
            .map(|(k, v)| Ok::<_, CliError>((k, json_to_value(v)?)))
            .collect(),
        _ => Err(CliError::BindingsNotObject),
    }
}
