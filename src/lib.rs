//! # playground-store
//!
//! State management for browser-based single-file-component playgrounds.
//!
//! The store tracks an in-memory set of virtual files and the state derived
//! from them. Compilation is delegated to an external compiler through the
//! [`CompileHook`] trait:
//!
//! - **Files**: ordered, named [`VirtualFile`]s with a compiled-output cache
//! - **Entry / active file**: which file is the app root, which one is edited
//! - **Import map**: `import-map.json` kept valid for the sandbox module loader
//! - **Sharing**: the whole file set round-trips through a URL fragment
//!
//! ## Quick Start
//!
//! ```ignore
//! use playground_store::prelude::*;
//!
//! let mut store = PlaygroundStore::new(StoreOptions::new(), NoopCompiler)?;
//! store.add_file(VirtualFile::new("Comp.vue", "<template>hi</template>"));
//!
//! let link = store.serialize()?; // "#eyJBcHAudnVlIjoi..."
//!
//! let restored = PlaygroundStore::new(
//!     StoreOptions::new().serialized_state(link),
//!     NoopCompiler,
//! )?;
//! assert_eq!(restored.get_files(), store.get_files());
//! ```
//!
//! ## Modules
//!
//! - [`store`]: the [`PlaygroundStore`] and its state
//! - [`config`]: global defaults and per-store options
//! - [`file`]: virtual files and the ordered file set
//! - [`import_map`]: the import map document
//! - [`codec`]: URL-fragment encoding
//! - [`compile`]: the compile hook seam

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod compile;
pub mod config;
pub mod error;
pub mod file;
pub mod import_map;
pub mod prelude;
pub mod store;

// =============================================================================
// Store
// =============================================================================

pub use store::{
    PlaygroundStore, SharedStore, StoreState, SubscriptionId, DEFAULT_CODE, DEFAULT_MAIN_FILE,
};

// =============================================================================
// Files & Import Map
// =============================================================================

pub use file::{CompiledOutput, FileSet, VirtualFile, IMPORT_MAP_FILE};
pub use import_map::{ImportMap, RUNTIME_SPECIFIER};

// =============================================================================
// Infrastructure
// =============================================================================

pub use codec::{atou, decode_files, encode_files, utoa};
pub use compile::{CompileHook, CompileResult, FnCompiler, NoopCompiler};
pub use config::{CompanionLibrary, Config, ConfigBuilder, OutputMode, StoreOptions};
pub use error::StoreError;
