//! Compile hook: the seam to the external single-file-component compiler.
//!
//! The store never compiles anything itself. It hands each file to a
//! [`CompileHook`] and records the result:
//!
//! - `Ok(output)` is cached on the file and clears the store's errors.
//! - `Err(messages)` replaces the store's errors.
//!
//! # Example
//!
//! ```ignore
//! use playground_store::{CompiledOutput, FnCompiler, PlaygroundStore, StoreOptions};
//!
//! let hook = FnCompiler::new(|file, _options| {
//!     Ok(CompiledOutput { js: my_compiler(file.code())?, ..Default::default() })
//! });
//! let store = PlaygroundStore::new(StoreOptions::new(), hook)?;
//! ```

use crate::file::{CompiledOutput, VirtualFile};

/// Result of one compile hook invocation.
pub type CompileResult = Result<CompiledOutput, Vec<String>>;

/// External compiler invoked for every file the store needs compiled.
///
/// Implementations must be `Send + Sync` so the store can be shared
/// (see [`SharedStore`](crate::store::SharedStore)).
pub trait CompileHook: Send + Sync {
    /// Compile one file.
    ///
    /// `options` are the store's compiler options, passed through untouched.
    fn compile(&self, file: &VirtualFile, options: &serde_json::Value) -> CompileResult;
}

impl<H: CompileHook + ?Sized> CompileHook for Box<H> {
    fn compile(&self, file: &VirtualFile, options: &serde_json::Value) -> CompileResult {
        (**self).compile(file, options)
    }
}

/// Hook that passes sources through unchanged as JavaScript.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCompiler;

impl CompileHook for NoopCompiler {
    fn compile(&self, file: &VirtualFile, _options: &serde_json::Value) -> CompileResult {
        Ok(CompiledOutput {
            js: file.code().to_string(),
            ..CompiledOutput::default()
        })
    }
}

/// Hook backed by a closure.
pub struct FnCompiler<F> {
    f: F,
}

impl<F> FnCompiler<F>
where
    F: Fn(&VirtualFile, &serde_json::Value) -> CompileResult + Send + Sync,
{
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> CompileHook for FnCompiler<F>
where
    F: Fn(&VirtualFile, &serde_json::Value) -> CompileResult + Send + Sync,
{
    fn compile(&self, file: &VirtualFile, options: &serde_json::Value) -> CompileResult {
        (self.f)(file, options)
    }
}
