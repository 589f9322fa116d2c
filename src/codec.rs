//! URL-fragment codec for sharing playground state.
//!
//! ```text
//! {"App.vue": "..."} ──JSON──► text ──utoa──► base64url ──► "#eyJBcHAu..."
//! ```
//!
//! The encoded form uses the URL-safe base64 alphabet without padding, so it
//! can be placed in a fragment without escaping. Decoding also accepts the
//! standard alphabet and padding, for links produced by other encoders.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use indexmap::IndexMap;

use crate::error::StoreError;

/// Encode text into a URL-fragment-safe string.
pub fn utoa(data: &str) -> String {
    URL_SAFE_NO_PAD.encode(data.as_bytes())
}

/// Decode a string produced by [`utoa`].
///
/// A leading `#` is ignored.
pub fn atou(encoded: &str) -> Result<String, StoreError> {
    let encoded = encoded.trim().trim_start_matches('#');
    let bytes = match URL_SAFE_NO_PAD.decode(encoded) {
        Ok(bytes) => bytes,
        Err(_) if encoded.ends_with('=') => STANDARD.decode(encoded)?,
        Err(_) => STANDARD_NO_PAD.decode(encoded)?,
    };
    Ok(String::from_utf8(bytes)?)
}

/// Encode a filename → source mapping.
pub fn encode_files(files: &IndexMap<String, String>) -> Result<String, StoreError> {
    Ok(utoa(&serde_json::to_string(files)?))
}

/// Decode a filename → source mapping, preserving key order.
pub fn decode_files(encoded: &str) -> Result<IndexMap<String, String>, StoreError> {
    let json = atou(encoded)?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    let serde_json::Value::Object(object) = value else {
        return Err(StoreError::InvalidState(format!(
            "expected JSON object, got {}",
            json_kind(&value)
        )));
    };

    let mut files = IndexMap::with_capacity(object.len());
    for (filename, code) in object {
        match code {
            serde_json::Value::String(code) => {
                files.insert(filename, code);
            }
            other => {
                return Err(StoreError::InvalidState(format!(
                    "source of '{filename}' is {}, expected string",
                    json_kind(&other)
                )));
            }
        }
    }
    Ok(files)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
