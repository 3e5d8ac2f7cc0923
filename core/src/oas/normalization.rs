#![deny(missing_docs)]

//! # Schema Normalization
//!
//! Rewrites JSON Schema fragments produced by a language model into the
//! OpenAPI 3.0 schema dialect. OpenAPI 3.0 has no `null` type, so null-bearing
//! types are promoted to a scalar type plus `nullable: true`.
//!
//! Exactly one branch applies per fragment, checked in this order:
//! null type, type array, `properties`, `items`, unions (`anyOf`/`oneOf`/`allOf`).
//! A type array that keeps more than one member falls through to the
//! structural branches.

use serde_json::{Map, Value};

const UNION_KEYWORDS: [&str; 3] = ["anyOf", "oneOf", "allOf"];

/// Normalizes one schema fragment.
///
/// Non-object values (including `null`, standing in for an absent schema)
/// are returned unchanged. The function is total and does not validate.
pub fn normalize_schema(schema: Value) -> Value {
    let Value::Object(mut map) = schema else {
        return schema;
    };

    if promote_nullable_type(&mut map) {
        return Value::Object(map);
    }

    if let Some(Value::Object(props)) = map.get_mut("properties") {
        for prop in props.values_mut() {
            *prop = normalize_schema(prop.take());
        }
        return Value::Object(map);
    }

    if let Some(items) = map.get_mut("items").filter(|v| !v.is_null()) {
        *items = normalize_schema(items.take());
        return Value::Object(map);
    }

    for keyword in UNION_KEYWORDS {
        if let Some(Value::Array(members)) = map.get_mut(keyword) {
            for member in members.iter_mut() {
                *member = normalize_schema(member.take());
            }
        }
    }

    Value::Object(map)
}

/// Normalizes an optional fragment; a missing schema is not an error.
pub fn normalize_optional(schema: Option<Value>) -> Option<Value> {
    schema.map(normalize_schema)
}

/// Rewrites `type` when it names `null`.
///
/// Returns `true` when the fragment is finished (collapsed to a scalar).
fn promote_nullable_type(map: &mut Map<String, Value>) -> bool {
    let (has_null, mut remaining) = match map.get("type") {
        Some(Value::String(t)) if t == "null" => (true, Vec::new()),
        Some(Value::Array(types)) => (
            types.iter().any(is_null_type),
            types
                .iter()
                .filter(|t| !is_null_type(t))
                .cloned()
                .collect::<Vec<_>>(),
        ),
        _ => return false,
    };

    match remaining.len() {
        0 if has_null => {
            map.insert("type".into(), Value::String("string".into()));
            map.insert("nullable".into(), Value::Bool(true));
            true
        }
        0 => false,
        1 => {
            map.insert("type".into(), remaining.remove(0));
            if has_null {
                map.insert("nullable".into(), Value::Bool(true));
            } else {
                map.remove("nullable");
            }
            true
        }
        _ => {
            map.insert("type".into(), Value::Array(remaining));
            if has_null {
                map.insert("nullable".into(), Value::Bool(true));
            }
            false
        }
    }
}

fn is_null_type(value: &Value) -> bool {
    value.as_str() == Some("null")
}
