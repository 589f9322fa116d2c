//! Store error type.

use thiserror::Error;

/// Error type for playground store operations.
///
/// # Example
///
/// ```ignore
/// match PlaygroundStore::new(options, NoopCompiler) {
///     Ok(store) => { /* ready */ }
///     Err(StoreError::Decode(e)) => eprintln!("bad share link: {e}"),
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum StoreError {
    /// Serialized state is not valid base64.
    #[error("invalid serialized state: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Decoded bytes are not valid UTF-8.
    #[error("serialized state is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Decoded JSON does not describe a file set.
    #[error("invalid file set: {0}")]
    InvalidState(String),

    /// No file is registered under the given name.
    #[error("unknown file: {0}")]
    UnknownFile(String),

    /// `import-map.json` could not be parsed.
    #[error("Syntax error in import-map.json: {message}")]
    ImportMap {
        /// Message from the JSON parser.
        message: String,
    },

    /// Unrecognized output mode name.
    #[error("unknown output mode: {0}")]
    OutputMode(String),
}

impl StoreError {
    /// Create an import map error from a parser message.
    pub fn import_map(message: impl Into<String>) -> Self {
        Self::ImportMap {
            message: message.into(),
        }
    }

    /// Check if this error came from reading shared state (codec or JSON layer).
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::Utf8(_) | Self::Json(_) | Self::InvalidState(_)
        )
    }
}
