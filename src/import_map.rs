//! Import map document for the sandbox module loader.
//!
//! Stored as the text of [`IMPORT_MAP_FILE`](crate::file::IMPORT_MAP_FILE)
//! inside the file set, so it travels through share links like any other file.
//!
//! ```json
//! {
//!   "imports": {
//!     "vue": "https://unpkg.com/@vue/runtime-dom@3.3.4/dist/runtime-dom.esm-browser.js",
//!     "fighting-design": "./es/index.js"
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::CompanionLibrary;
use crate::error::StoreError;

/// Bare specifier of the framework runtime. Always present after repair.
pub const RUNTIME_SPECIFIER: &str = "vue";

/// Parsed import map.
///
/// Keys other than `imports` (such as `scopes`) are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportMap {
    /// Bare specifier → URL.
    #[serde(default)]
    pub imports: IndexMap<String, String>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl ImportMap {
    /// Fresh map resolving the runtime and the companion library.
    pub fn with_runtime(runtime_url: &str, companion: &CompanionLibrary) -> Self {
        let mut imports = IndexMap::with_capacity(companion.imports.len() + 1);
        imports.insert(RUNTIME_SPECIFIER.to_string(), runtime_url.to_string());
        for (specifier, url) in &companion.imports {
            imports.insert(specifier.clone(), url.clone());
        }
        Self {
            imports,
            extra: serde_json::Map::new(),
        }
    }

    /// Parse import map text.
    pub fn parse(text: &str) -> Result<Self, StoreError> {
        serde_json::from_str(text).map_err(|e| StoreError::import_map(e.to_string()))
    }

    /// Render as 2-space indented JSON.
    pub fn to_pretty_string(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// URL the runtime specifier resolves to.
    pub fn runtime_url(&self) -> Option<&str> {
        self.imports.get(RUNTIME_SPECIFIER).map(String::as_str)
    }

    /// Add the runtime entry if missing. Returns `true` if the map changed.
    ///
    /// Existing entries, including an existing runtime entry, are untouched.
    pub fn ensure_runtime(&mut self, runtime_url: &str) -> bool {
        if self.imports.contains_key(RUNTIME_SPECIFIER) {
            return false;
        }
        self.imports
            .insert(RUNTIME_SPECIFIER.to_string(), runtime_url.to_string());
        true
    }

    /// Point the runtime specifier at a new URL. Returns `true` if the map changed.
    pub fn set_runtime(&mut self, runtime_url: &str) -> bool {
        match self.imports.get_mut(RUNTIME_SPECIFIER) {
            Some(url) if url == runtime_url => false,
            Some(url) => {
                *url = runtime_url.to_string();
                true
            }
            None => self.ensure_runtime(runtime_url),
        }
    }

    /// Check if the map has no entries and no extra keys.
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.extra.is_empty()
    }
}
