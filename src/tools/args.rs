//! Lenient argument parsing.
//!
//! Agents do not always send the types a schema asks for: lists arrive as
//! JSON-encoded strings, single queries as bare strings, numbers as numeric
//! strings. These helpers accept all of those shapes.

use runai_search::{SourceFilter, SourcePreset};
use serde_json::Value;

/// Parse a list argument.
///
/// Accepts a JSON array, a string holding a JSON array, or a non-blank
/// plain string (wrapped as one element). Non-string elements are dropped.
/// Returns `None` when the value is missing, empty, or any other shape.
pub fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = match value? {
        Value::Array(items) => strings(items),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => strings(&items),
            _ if !raw.trim().is_empty() => vec![raw.trim().to_owned()],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    if items.is_empty() { None } else { Some(items) }
}

fn strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|v| v.as_str().map(str::to_owned))
        .collect()
}

/// Parse an integer argument given as a number or a numeric string.
pub fn integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Parse the `sources` argument of the web search tool.
///
/// An array (or JSON-array string) is an explicit domain list; a preset
/// name selects that preset. Anything else means no filter.
pub fn source_filter(value: Option<&Value>) -> Option<SourceFilter> {
    match value? {
        Value::String(raw) => {
            if let Some(preset) = SourcePreset::from_name(raw.trim()) {
                return Some(SourceFilter::Preset(preset));
            }
            match serde_json::from_str::<Value>(raw) {
                Ok(Value::Array(items)) => Some(SourceFilter::Domains(strings(&items))),
                _ => None,
            }
        }
        Value::Array(items) => Some(SourceFilter::Domains(strings(items))),
        _ => None,
    }
}

/// Short JSON type name for error messages.
pub fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None | Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}
