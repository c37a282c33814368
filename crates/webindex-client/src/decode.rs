//! Response decoding for the CGI endpoints.

use serde_json::Value;

use crate::error::ClientError;
use crate::service::{RawSamples, SearchHits};

/// Truthiness of an existence-check response.
///
/// `null`, `false`, `0`, `""`, `[]` and `{}` mean "no index"; anything else
/// means an index exists.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Parse a body that may be empty or plain text into a JSON value.
///
/// An empty body becomes `null`; text that is not JSON is kept as a string.
pub fn parse_lenient(body: &str) -> Value {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}

/// Decode a search response: an object whose values are all strings.
///
/// Pairs keep the order in which the document lists them.
pub fn decode_search_hits(value: Value) -> Result<SearchHits, ClientError> {
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(ClientError::Decode(format!(
                "search response must be an object, got {}",
                kind(&other)
            )))
        }
    };

    map.into_iter()
        .map(|(key, raw)| match raw {
            Value::String(url) => Ok((key, url)),
            other => Err(ClientError::Decode(format!(
                "search result {key:?} must be a string, got {}",
                kind(&other)
            ))),
        })
        .collect()
}

/// Decode a samples response. Key and value validation happens when the
/// samples are parsed into a series.
pub fn decode_samples(value: Value) -> Result<RawSamples, ClientError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ClientError::Decode(format!(
            "samples response must be an object, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
