//! Parameter pipeline: validated tool-call arguments into an outbound HTTP request.
//!
//! Pure functions cover each step: path substitution, query/body partitioning, and
//! the wire encodings for query strings and form bodies. Each owns exactly one
//! concern so the dispatch layer stays a thin orchestration of these functions.

use crate::error::{MailgunToolsError, Result};
use reqwest::Method;
use serde_json::{Map, Value};

/// Substitute every path-located parameter into `template` and remove the consumed
/// keys from `args`. Path parameters are always required, regardless of how the
/// description flags them.
///
/// # Errors
///
/// Returns an error naming the first path parameter that has no argument.
pub fn substitute_path_params(
    template: &str,
    path_params: &[String],
    args: &mut Map<String, Value>,
) -> Result<String> {
    let mut path = template.to_string();
    for name in path_params {
        let value = args.remove(name).ok_or_else(|| {
            MailgunToolsError::InvalidArguments(format!(
                "Missing required path parameter: {name}"
            ))
        })?;
        path = path.replace(
            &format!("{{{name}}}"),
            &percent_encode(&value_to_string(&value)),
        );
    }
    Ok(path)
}

/// Split the remaining arguments into query and body sets. Names declared as query
/// parameters go to the query set, everything else to the body. GET requests carry
/// no payload, so their body set is folded into the query set.
#[must_use]
pub fn partition_arguments(
    method: &Method,
    query_params: &[String],
    args: Map<String, Value>,
) -> (Map<String, Value>, Map<String, Value>) {
    let mut query = Map::new();
    let mut body = Map::new();
    for (name, value) in args {
        if query_params.contains(&name) {
            query.insert(name, value);
        } else {
            body.insert(name, value);
        }
    }
    if *method == Method::GET {
        query.append(&mut body);
    }
    (query, body)
}

/// Append the query set to `path` as `path?key=value&...`, skipping null values.
/// An empty query set returns the path unchanged.
#[must_use]
pub fn append_query_string(path: &str, query: &Map<String, Value>) -> String {
    let pairs: Vec<String> = query
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| {
            format!(
                "{}={}",
                percent_encode(name),
                percent_encode(&value_to_string(value))
            )
        })
        .collect();
    if pairs.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", pairs.join("&"))
    }
}

/// Flatten the body set into form key/value pairs. Array values become repeated
/// keys; null values are dropped.
#[must_use]
pub fn form_pairs(body: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (name, value) in body {
        match value {
            Value::Null => {}
            Value::Array(entries) => {
                for entry in entries {
                    pairs.push((name.clone(), value_to_string(entry)));
                }
            }
            other => pairs.push((name.clone(), value_to_string(other))),
        }
    }
    pairs
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(entries) => entries
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
        Value::Null => String::new(),
    }
}

fn percent_encode(s: &str) -> String {
    // Percent-encode every byte outside the RFC 3986 unreserved set:
    // ALPHA / DIGIT / "-" / "." / "_" / "~".
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if is_unreserved(b) {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0F) as usize] as char);
        }
    }
    out
}

fn is_unreserved(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~')
}
