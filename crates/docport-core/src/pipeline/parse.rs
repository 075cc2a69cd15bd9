//! Input normalization for the importer.
//!
//! Core does no I/O. Callers hand over one of:
//! - raw text
//! - raw bytes (UTF-8 JSON)
//! - an already-parsed JSON value
//!
//! Legacy exports sometimes arrive as a JSON array of byte values holding the
//! UTF-8 text of the document. Both the raw-bytes form and that array form are
//! decoded and parsed here, so later stages only ever see a JSON object.

use serde_json::Value;

use crate::errors::{DocportError, DocportResult};

/// Anything the importer accepts as a document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentInput {
    Text(String),
    Bytes(Vec<u8>),
    Value(Value),
}

impl From<String> for DocumentInput {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for DocumentInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Vec<u8>> for DocumentInput {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<Value> for DocumentInput {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

/// Parse JSON bytes into `serde_json::Value` with a hard size limit.
pub fn parse_json_bytes(bytes: &[u8], max_bytes: usize) -> DocportResult<Value> {
    if bytes.len() > max_bytes {
        return Err(DocportError::invalid_argument(format!(
            "JSON payload too large ({} bytes > limit {})",
            bytes.len(),
            max_bytes
        )));
    }

    serde_json::from_slice(bytes)
        .map_err(|e| DocportError::serialization(format!("failed to parse JSON: {e}")))
}

/// Normalize any accepted input into a parsed JSON value.
pub fn normalize_input(input: DocumentInput, max_bytes: usize) -> DocportResult<Value> {
    let value = match input {
        DocumentInput::Text(s) => parse_json_bytes(s.as_bytes(), max_bytes)?,
        DocumentInput::Bytes(b) => {
            let text = std::str::from_utf8(&b)
                .map_err(|e| DocportError::serialization(format!("input is not UTF-8: {e}")))?;
            parse_json_bytes(text.as_bytes(), max_bytes)?
        }
        DocumentInput::Value(v) => v,
    };

    match legacy_byte_array(&value) {
        Some(bytes) => {
            let text = String::from_utf8(bytes).map_err(|e| {
                DocportError::serialization(format!("byte-array input is not UTF-8: {e}"))
            })?;
            parse_json_bytes(text.as_bytes(), max_bytes)
        }
        None => Ok(value),
    }
}

/// Decode `[123, 34, ...]` into bytes. `None` unless every item is a byte.
fn legacy_byte_array(v: &Value) -> Option<Vec<u8>> {
    let items = v.as_array()?;
    if items.is_empty() {
        return None;
    }
    items
        .iter()
        .map(|x| x.as_u64().and_then(|n| u8::try_from(n).ok()))
        .collect()
}
