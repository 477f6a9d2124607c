//! Tool parameter validation against each tool's JSON Schema.
//!
//! Only the subset of JSON Schema the built-in tools use is checked:
//! `required` and primitive `type`s. Unknown keys pass through untouched.

use anyhow::{bail, Result};
use serde_json::{Map, Value};

/// Validate `params` against `schema` and return them as an object. A
/// `null` body counts as an empty object.
pub fn validate_params(schema: &Value, params: &Value) -> Result<Value> {
    let result = match params {
        Value::Object(map) => map.clone(),
        Value::Null => Map::new(),
        other => bail!("parameters must be a JSON object, got {}", json_type_name(other)),
    };

    let required = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(Value::as_str).collect::<Vec<_>>())
        .unwrap_or_default();

    for field in required {
        match result.get(field) {
            None | Some(Value::Null) => bail!("missing required parameter: {}", field),
            Some(_) => {}
        }
    }

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(Value::Object(result));
    };

    for (name, prop) in properties {
        // Optional parameters may be absent or sent as explicit nulls.
        let Some(value) = result.get(name).filter(|v| !v.is_null()) else {
            continue;
        };

        if let Some(expected) = prop.get("type").and_then(Value::as_str) {
            if !type_matches(expected, value) {
                bail!(
                    "parameter '{}' must be of type '{}', got {}",
                    name,
                    expected,
                    json_type_name(value)
                );
            }
        }
    }

    Ok(Value::Object(result))
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    }
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
