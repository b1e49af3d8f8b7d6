//! Conversions between Value and serde types.

use serde::de::DeserializeOwned;
use serde::Serialize;
use zettings_core::{Error, Tree, Value};

/// Convert a Value to a Rust type via serde.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    // Convert Value to serde_json::Value first, then deserialize
    let json = value_to_json(value);
    serde_json::from_value(json).map_err(Error::decode)
}

/// Convert a Rust type to a Value via serde.
///
/// `None` fields come through as `Value::Null`, which the engine refuses to
/// store. Skip them with `#[serde(skip_serializing_if = "Option::is_none")]`.
pub fn to_value<T: Serialize>(data: &T) -> Result<Value, Error> {
    // Serialize to serde_json::Value first, then convert to Value
    let json = serde_json::to_value(data).map_err(Error::encode)?;
    Ok(json_to_value(json))
}

/// Convert our Value to serde_json::Value.
pub fn value_to_json(value: Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(b),
        Value::Integer(i) => serde_json::Value::Number(i.into()),
        Value::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s),
        Value::Array(arr) => serde_json::Value::Array(arr.into_iter().map(value_to_json).collect()),
        Value::Tree(tree) => serde_json::Value::Object(
            tree.into_iter()
                .map(|(k, v)| (k, value_to_json(v)))
                .collect(),
        ),
    }
}

/// Convert serde_json::Value to our Value.
pub fn json_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                // Fallback for very large numbers
                Value::String(n.to_string())
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(json_to_value).collect()),
        serde_json::Value::Object(map) => Value::Tree(
            map.into_iter()
                .map(|(k, v)| (k, json_to_value(v)))
                .collect(),
        ),
    }
}

/// Convert a parsed TOML value to our Value.
///
/// TOML datetimes have no counterpart and become their RFC 3339 text.
pub fn toml_to_value(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Integer(i),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_value).collect()),
        toml::Value::Table(table) => Value::Tree(table_to_tree(table)),
    }
}

pub(crate) fn table_to_tree(table: toml::Table) -> Tree {
    table
        .into_iter()
        .map(|(k, v)| (k, toml_to_value(v)))
        .collect()
}

/// Convert our Value to a TOML value.
///
/// Fails on `Null`, which TOML cannot express.
pub fn value_to_toml(value: &Value) -> Result<toml::Value, Error> {
    Ok(match value {
        Value::Null => {
            return Err(Error::encode(format!(
                "TOML has no representation for {}",
                value.kind()
            )))
        }
        Value::Bool(b) => toml::Value::Boolean(*b),
        Value::Integer(i) => toml::Value::Integer(*i),
        Value::Float(f) => toml::Value::Float(*f),
        Value::String(s) => toml::Value::String(s.clone()),
        Value::Array(arr) => toml::Value::Array(
            arr.iter()
                .map(value_to_toml)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Tree(tree) => toml::Value::Table(tree_to_table(tree)?),
    })
}

pub(crate) fn tree_to_table(tree: &Tree) -> Result<toml::Table, Error> {
    let mut table = toml::Table::new();
    for (key, value) in tree {
        let converted = value_to_toml(value).map_err(|e| match e {
            Error::Encode { message } => Error::encode(format!("{} (at '{}')", message, key)),
            other => other,
        })?;
        table.insert(key.clone(), converted);
    }
    Ok(table)
}

/// Interpret command-line text as a value.
///
/// Anything that reads as a TOML value literal (`42`, `2.5`, `true`,
/// `[1, 2]`, `"quoted"`, `{ a = 1 }`) keeps its type; everything else is
/// taken as a plain string.
pub fn parse_literal(text: &str) -> Value {
    let document = format!("literal = {}", text);
    match document.parse::<toml::Table>() {
        Ok(mut table) => match table.remove("literal") {
            Some(value) => toml_to_value(value),
            None => Value::String(text.to_string()),
        },
        Err(_) => Value::String(text.to_string()),
    }
}
