//! Prelude module for convenient imports.
//!
//! ```ignore
//! use playground_store::prelude::*;
//! ```

// Store
pub use crate::store::{PlaygroundStore, SharedStore, StoreState, SubscriptionId};

// Files
pub use crate::file::{CompiledOutput, FileSet, VirtualFile};
pub use crate::import_map::ImportMap;

// Compile hook
pub use crate::compile::{CompileHook, CompileResult, FnCompiler, NoopCompiler};

// Configuration
pub use crate::config::{CompanionLibrary, ConfigBuilder, OutputMode, StoreOptions};

// Errors
pub use crate::error::StoreError;
