//! # Parameter Styles
//!
//! RFC6570 style parameter strings used as documentation examples.
//!
//! Values are `serde_json::Value`s and are rendered the way a query or header
//! value would appear on the wire: strings verbatim, numbers in their shortest
//! form, arrays joined by the style's separator, objects as key/value runs.
//! "Empty" values (`null`, `false`, `0`, `""`) get the style's empty form or
//! are rejected, depending on the style.

use crate::error::{AppResult, DoctestError};
use serde_json::{Map, Value};

const UNEXPECTED_PARAMETER_VALUE: &str = "Unexpected parameter string value";

/// Builds a form-style parameter string (`color=blue`, `color=blue&color=black`).
pub fn form_parameter_string(name: &str, value: &Value, explode: bool) -> AppResult<String> {
    if is_empty_value(value) {
        return Ok(format!("{name}="));
    }
    match value {
        Value::String(_) | Value::Number(_) => Ok(format!("{name}={}", render(value))),
        Value::Array(items) if explode => Ok(items
            .iter()
            .map(|entry| format!("{name}={}", render_element(entry)))
            .collect::<Vec<_>>()
            .join("&")),
        Value::Array(items) => Ok(format!("{name}={}", join(items, ","))),
        Value::Object(map) if explode => Ok(pairs(map, "=", "&")),
        Value::Object(map) => Ok(format!("{name}={}", flattened_pairs(map))),
        other => unexpected(other),
    }
}

/// Builds a label-style parameter string (`.blue`, `.R=100.G=200`).
pub fn label_parameter_string(value: &Value, explode: bool) -> AppResult<String> {
    if is_empty_value(value) {
        return Ok(".".to_string());
    }
    match value {
        Value::String(_) | Value::Number(_) => Ok(format!(".{}", render(value))),
        Value::Array(items) => Ok(format!(".{}", join(items, "."))),
        Value::Object(map) if explode => Ok(format!(".{}", pairs(map, "=", "."))),
        Value::Object(map) => Ok(format!(".{}", pairs(map, ".", "."))),
        other => unexpected(other),
    }
}

/// Builds a matrix-style parameter string (`;color=blue`, `;R=100;G=200`).
pub fn matrix_parameter_string(name: &str, value: &Value, explode: bool) -> AppResult<String> {
    if is_empty_value(value) {
        return Ok(format!(";{name}"));
    }
    match value {
        Value::String(_) | Value::Number(_) => Ok(format!(";{name}={}", render(value))),
        Value::Array(items) if explode => Ok(format!(
            ";{}",
            items
                .iter()
                .map(|entry| format!("{name}={}", render_element(entry)))
                .collect::<Vec<_>>()
                .join(";")
        )),
        Value::Array(items) => Ok(format!(";{name}={}", join(items, ","))),
        Value::Object(map) if explode => Ok(format!(";{}", pairs(map, "=", ";"))),
        Value::Object(map) => Ok(format!(";{name}={}", flattened_pairs(map))),
        other => unexpected(other),
    }
}

/// Builds a simple-style parameter string (`blue`, `blue,black`).
///
/// Empty values are rejected.
pub fn simple_parameter_string(value: &Value, explode: bool) -> AppResult<String> {
    if is_empty_value(value) {
        return not_acceptable("Falsy", "simple-style");
    }
    match value {
        Value::String(_) | Value::Number(_) => Ok(render(value)),
        Value::Array(items) => Ok(join(items, ",")),
        Value::Object(map) if explode => Ok(pairs(map, "=", ",")),
        Value::Object(map) => Ok(pairs(map, ",", ",")),
        other => unexpected(other),
    }
}

/// Builds a space-delimited parameter string (`blue%20black`).
///
/// Only arrays and objects are accepted.
pub fn space_delimited_parameter_string(value: &Value) -> AppResult<String> {
    delimited(value, "%20", "space-delimited")
}

/// Builds a pipe-delimited parameter string (`blue|black`).
///
/// Only arrays and objects are accepted.
pub fn pipe_delimited_parameter_string(value: &Value) -> AppResult<String> {
    delimited(value, "|", "pipe-delimited")
}

/// Builds a deep-object parameter string (`color[R]=100&color[G]=200`).
///
/// Only objects are accepted.
pub fn deep_object_parameter_string(name: &str, value: &Value) -> AppResult<String> {
    if is_empty_value(value) {
        return not_acceptable("Falsy", "deep object");
    }
    match value {
        Value::String(_) | Value::Number(_) => not_acceptable("String or Number", "deep object"),
        Value::Array(_) => not_acceptable("Array", "deep object"),
        Value::Object(map) => Ok(map
            .iter()
            .map(|(key, v)| format!("{name}[{key}]={}", render(v)))
            .collect::<Vec<_>>()
            .join("&")),
        other => unexpected(other),
    }
}

/// Returns true for `null`, `false`, `0` and `""`.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn delimited(value: &Value, separator: &str, style: &str) -> AppResult<String> {
    if is_empty_value(value) {
        return not_acceptable("Falsy", style);
    }
    match value {
        Value::String(_) | Value::Number(_) => not_acceptable("String or Number", style),
        Value::Array(items) => Ok(join(items, separator)),
        Value::Object(map) => Ok(pairs(map, separator, separator)),
        other => unexpected(other),
    }
}

/// `key<kv>value` entries joined by `sep`; a `null` value renders as `null`.
fn pairs(map: &Map<String, Value>, kv: &str, sep: &str) -> String {
    map.iter()
        .map(|(key, v)| format!("{key}{kv}{}", render(v)))
        .collect::<Vec<_>>()
        .join(sep)
}

/// Keys and values flattened into one comma-separated list, so a `null`
/// value renders as nothing.
fn flattened_pairs(map: &Map<String, Value>) -> String {
    map.iter()
        .map(|(key, v)| format!("{key},{}", render_element(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn join(items: &[Value], sep: &str) -> String {
    items
        .iter()
        .map(render_element)
        .collect::<Vec<_>>()
        .join(sep)
}

/// Wire rendering of a single value.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => join(items, ","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Like `render`, but `null` inside a list renders as nothing.
fn render_element(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => render(other),
    }
}

fn not_acceptable(kind: &str, style: &str) -> AppResult<String> {
    Err(DoctestError::ParameterEncoding(format!(
        "{kind} values are not valid for {style} parameters"
    )))
}

fn unexpected(value: &Value) -> AppResult<String> {
    Err(DoctestError::ParameterEncoding(format!(
        "{UNEXPECTED_PARAMETER_VALUE}: {value}"
    )))
}
