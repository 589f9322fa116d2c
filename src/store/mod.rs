//! Playground store: virtual files plus the state derived from them.
//!
//! ```text
//! StoreOptions ──► PlaygroundStore::new
//!                    │
//!                    ├─► decode share link / default App.vue
//!                    ├─► pick main file
//!                    ├─► ensure import-map.json
//!                    ├─► inject companion helper file
//!                    └─► compile active file, then every other file
//!
//! set_active / add_file / set_code(active) ──► compile active ──► listeners
//! ```

mod defaults;
mod subscription;

use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, info, warn};
use parking_lot::RwLock;

use crate::codec;
use crate::compile::CompileHook;
use crate::config::{CompanionLibrary, OutputMode, StoreOptions};
use crate::error::StoreError;
use crate::file::{FileSet, IMPORT_MAP_FILE, VirtualFile};
use crate::import_map::ImportMap;

pub use defaults::{DEFAULT_CODE, DEFAULT_MAIN_FILE};
pub use subscription::SubscriptionId;

use subscription::Subscribers;

/// Store shared between several owners.
pub type SharedStore = Arc<RwLock<PlaygroundStore>>;

/// Observable state of a playground.
///
/// `active_file` and `main_file` always name entries of `files`.
#[derive(Debug, Clone)]
pub struct StoreState {
    main_file: String,
    files: FileSet,
    active_file: String,
    errors: Vec<String>,
    runtime_url: String,
    companion_url: String,
}

impl StoreState {
    /// Entry file name.
    pub fn main_file(&self) -> &str {
        &self.main_file
    }

    /// All files, hidden ones included.
    pub fn files(&self) -> &FileSet {
        &self.files
    }

    /// Name of the file shown in the editor.
    pub fn active_filename(&self) -> &str {
        &self.active_file
    }

    /// File shown in the editor.
    pub fn active_file(&self) -> Option<&VirtualFile> {
        self.files.get(&self.active_file)
    }

    /// Current errors, replaced wholesale by each reporter.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// URL the runtime specifier resolves to.
    pub fn runtime_url(&self) -> &str {
        &self.runtime_url
    }

    /// Entry module URL of the companion library.
    pub fn companion_url(&self) -> &str {
        &self.companion_url
    }
}

/// In-memory registry of named virtual files for one playground.
pub struct PlaygroundStore {
    state: StoreState,
    compiler: Box<dyn CompileHook>,
    sfc_options: serde_json::Value,
    companion: CompanionLibrary,
    initial_show_output: bool,
    initial_output_mode: OutputMode,
    subscribers: Subscribers,
    started: bool,
}

impl PlaygroundStore {
    /// Build a store from options.
    ///
    /// Fails only when `serialized_state` cannot be decoded.
    pub fn new(
        options: StoreOptions,
        compiler: impl CompileHook + 'static,
    ) -> Result<Self, StoreError> {
        let StoreOptions {
            serialized_state,
            default_runtime_url,
            show_output,
            output_mode,
            show_helper_files,
            companion,
            sfc_options,
            defer_compile,
        } = options;

        let mut files = if serialized_state.trim().trim_start_matches('#').is_empty() {
            FileSet::from_sources([(DEFAULT_MAIN_FILE, DEFAULT_CODE)])
        } else {
            FileSet::from_sources(codec::decode_files(&serialized_state)?)
        };
        if files.is_empty() {
            files.insert(VirtualFile::new(DEFAULT_MAIN_FILE, DEFAULT_CODE));
        }

        let main_file = if files.contains(DEFAULT_MAIN_FILE) {
            DEFAULT_MAIN_FILE.to_string()
        } else {
            files
                .first_filename()
                .unwrap_or(DEFAULT_MAIN_FILE)
                .to_string()
        };

        let mut store = Self {
            state: StoreState {
                active_file: main_file.clone(),
                main_file,
                files,
                errors: Vec::new(),
                runtime_url: default_runtime_url,
                companion_url: companion.entry_url(),
            },
            compiler: Box::new(compiler),
            sfc_options,
            companion,
            initial_show_output: show_output,
            initial_output_mode: output_mode,
            subscribers: Subscribers::default(),
            started: false,
        };

        store.ensure_import_map();

        let helper = VirtualFile::new(
            store.companion.plugin_file.clone(),
            store.companion.plugin_code.clone(),
        )
        .with_hidden(!show_helper_files);
        store.state.files.insert(helper);

        debug!(
            "store created: {} files, main file {}",
            store.state.files.len(),
            store.state.main_file
        );

        if !defer_compile {
            store.init();
        }
        Ok(store)
    }

    /// Wrap into a [`SharedStore`].
    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    /// Start compiling: the active file first, then every other non-entry file.
    ///
    /// Called by [`new`](Self::new) unless compilation was deferred.
    pub fn init(&mut self) {
        self.started = true;
        self.active_changed();

        let others: Vec<String> = self
            .state
            .files
            .filenames()
            .filter(|name| *name != self.state.main_file)
            .map(str::to_string)
            .collect();
        for name in others {
            self.compile(&name);
        }

        // A successful compile clears errors; check the import map last.
        self.ensure_import_map();
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current state.
    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// All files, hidden ones included.
    pub fn files(&self) -> &FileSet {
        &self.state.files
    }

    /// Entry file name.
    pub fn main_file(&self) -> &str {
        &self.state.main_file
    }

    /// File shown in the editor.
    pub fn active_file(&self) -> Option<&VirtualFile> {
        self.state.active_file()
    }

    /// Current errors.
    pub fn errors(&self) -> &[String] {
        &self.state.errors
    }

    /// URL the runtime specifier resolves to.
    pub fn runtime_url(&self) -> &str {
        &self.state.runtime_url
    }

    /// Whether the output pane starts open.
    pub fn initial_show_output(&self) -> bool {
        self.initial_show_output
    }

    /// Initial output pane mode.
    pub fn initial_output_mode(&self) -> OutputMode {
        self.initial_output_mode
    }

    /// Compiler options handed to the compile hook.
    pub fn sfc_options(&self) -> &serde_json::Value {
        &self.sfc_options
    }

    // =========================================================================
    // Active File
    // =========================================================================

    /// Make `filename` the active file.
    ///
    /// Unknown names are rejected and leave the state unchanged.
    pub fn set_active(&mut self, filename: &str) -> Result<(), StoreError> {
        if !self.state.files.contains(filename) {
            return Err(StoreError::UnknownFile(filename.to_string()));
        }
        if self.state.active_file != filename {
            self.state.active_file = filename.to_string();
            self.active_changed();
        }
        Ok(())
    }

    /// Register a listener fired after the active file is (re)compiled.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&VirtualFile) + Send + Sync + 'static,
    {
        self.subscribers.add(Box::new(listener))
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    // =========================================================================
    // File Operations
    // =========================================================================

    /// Insert a file (or an empty file by name), replacing any file of the same name.
    ///
    /// Visible files become active.
    pub fn add_file(&mut self, file: impl Into<VirtualFile>) {
        let file = file.into();
        let name = file.filename().to_string();
        let hidden = file.is_hidden();
        self.state.files.insert(file);

        if !hidden {
            self.state.active_file = name;
            self.active_changed();
        } else if self.state.active_file == name {
            self.active_changed();
        }
    }

    /// Replace a file's source. Returns `true` if the source changed.
    pub fn set_code(
        &mut self,
        filename: &str,
        code: impl Into<String>,
    ) -> Result<bool, StoreError> {
        let file = self
            .state
            .files
            .get_mut(filename)
            .ok_or_else(|| StoreError::UnknownFile(filename.to_string()))?;
        let changed = file.set_code(code);
        if changed && self.state.active_file == filename {
            self.active_changed();
        }
        Ok(changed)
    }

    /// Remove a file. Returns `true` if a file was removed.
    ///
    /// `import-map.json` and the companion helper file cannot be removed.
    /// Removing the entry file moves the entry to the first remaining visible
    /// file; removing the active file activates the entry file.
    pub fn delete_file(&mut self, filename: &str) -> bool {
        if filename == IMPORT_MAP_FILE || filename == self.companion.plugin_file {
            warn!("refusing to delete {filename}");
            return false;
        }
        if self.state.files.remove(filename).is_none() {
            return false;
        }

        if self.state.main_file == filename {
            let fallback = self
                .state
                .files
                .visible()
                .map(VirtualFile::filename)
                .find(|name| *name != IMPORT_MAP_FILE && *name != self.companion.plugin_file)
                .or_else(|| self.state.files.first_filename())
                .unwrap_or(IMPORT_MAP_FILE)
                .to_string();
            debug!("main file {filename} deleted, falling back to {fallback}");
            self.state.main_file = fallback;
        }

        if self.state.active_file == filename {
            self.state.active_file = self.state.main_file.clone();
            self.active_changed();
        }
        true
    }

    /// Filename → source for every file.
    pub fn get_files(&self) -> IndexMap<String, String> {
        self.state.files.sources()
    }

    /// Encode every file into a `#`-prefixed URL fragment.
    pub fn serialize(&self) -> Result<String, StoreError> {
        Ok(format!("#{}", codec::encode_files(&self.get_files())?))
    }

    /// Replace all files, compiling each new file before publishing.
    ///
    /// `main_file` defaults to [`DEFAULT_MAIN_FILE`], which is synthesized with
    /// default content when missing from `new_files`. Any other entry name must
    /// be present in `new_files`.
    pub fn set_files<I, K, V>(
        &mut self,
        new_files: I,
        main_file: Option<&str>,
    ) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let main_file = main_file.unwrap_or(DEFAULT_MAIN_FILE).to_string();
        let sources: Vec<(String, String)> = new_files
            .into_iter()
            .map(|(name, code)| (name.into(), code.into()))
            .collect();

        let mut files = FileSet::new();
        if main_file == DEFAULT_MAIN_FILE && !sources.iter().any(|(name, _)| *name == main_file) {
            files.insert(VirtualFile::new(DEFAULT_MAIN_FILE, DEFAULT_CODE));
        }
        for (name, code) in sources {
            files.insert(VirtualFile::new(name, code));
        }
        if !files.contains(&main_file) {
            return Err(StoreError::UnknownFile(main_file));
        }

        let names: Vec<String> = files.filenames().map(str::to_string).collect();
        for name in &names {
            if let Some(file) = files.get_mut(name) {
                compile_into(
                    &*self.compiler,
                    &self.sfc_options,
                    file,
                    &mut self.state.errors,
                );
            }
        }

        info!("replacing files: {} files, main file {main_file}", files.len());
        self.state.main_file = main_file.clone();
        self.state.files = files;

        // The previous active file is gone; force the switch.
        self.state.active_file = main_file;
        self.active_changed();

        // After the active compile, which clears errors on success.
        self.ensure_import_map();
        Ok(())
    }

    // =========================================================================
    // Import Map
    // =========================================================================

    /// Parse `import-map.json`.
    ///
    /// On failure the errors are replaced with a single syntax error message
    /// and an empty map is returned.
    pub fn get_import_map(&mut self) -> ImportMap {
        match self.read_import_map() {
            Ok(map) => map,
            Err(err) => {
                self.report_import_map_error(err);
                ImportMap::default()
            }
        }
    }

    /// Point the runtime specifier at `url`, rewriting `import-map.json`.
    pub fn set_runtime_url(&mut self, url: impl Into<String>) {
        self.state.runtime_url = url.into();
        if let Err(err) = self.try_set_runtime_url() {
            self.report_import_map_error(err);
        }
    }

    fn try_set_runtime_url(&mut self) -> Result<(), StoreError> {
        let mut map = self.read_import_map()?;
        if map.set_runtime(&self.state.runtime_url) {
            self.write_import_map(&map)?;
        }
        Ok(())
    }

    /// Create `import-map.json`, or add the runtime entry to an existing one.
    fn ensure_import_map(&mut self) {
        if let Err(err) = self.try_ensure_import_map() {
            self.report_import_map_error(err);
        }
    }

    fn try_ensure_import_map(&mut self) -> Result<(), StoreError> {
        if !self.state.files.contains(IMPORT_MAP_FILE) {
            let map = ImportMap::with_runtime(&self.state.runtime_url, &self.companion);
            self.state
                .files
                .insert(VirtualFile::new(IMPORT_MAP_FILE, map.to_pretty_string()?));
            debug!("created {IMPORT_MAP_FILE}");
            return Ok(());
        }

        let mut map = self.read_import_map()?;
        if map.ensure_runtime(&self.state.runtime_url) {
            self.write_import_map(&map)?;
            debug!("added runtime entry to {IMPORT_MAP_FILE}");
        }
        Ok(())
    }

    fn read_import_map(&self) -> Result<ImportMap, StoreError> {
        let file = self
            .state
            .files
            .get(IMPORT_MAP_FILE)
            .ok_or_else(|| StoreError::import_map("file is missing"))?;
        ImportMap::parse(file.code())
    }

    fn write_import_map(&mut self, map: &ImportMap) -> Result<(), StoreError> {
        let text = map.to_pretty_string()?;
        self.set_code(IMPORT_MAP_FILE, text)?;
        Ok(())
    }

    fn report_import_map_error(&mut self, err: StoreError) {
        let message = match err {
            err @ StoreError::ImportMap { .. } => err.to_string(),
            other => StoreError::import_map(other.to_string()).to_string(),
        };
        warn!("{message}");
        self.state.errors = vec![message];
    }

    // =========================================================================
    // Compilation
    // =========================================================================

    fn compile(&mut self, filename: &str) {
        if let Some(file) = self.state.files.get_mut(filename) {
            compile_into(&*self.compiler, &self.sfc_options, file, &mut self.state.errors);
        }
    }

    /// Recompile the active file and notify listeners.
    fn active_changed(&mut self) {
        if !self.started {
            return;
        }
        let name = self.state.active_file.clone();
        self.compile(&name);
        if let Some(file) = self.state.files.get(&name) {
            self.subscribers.notify(file);
        }
    }
}

impl std::fmt::Debug for PlaygroundStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaygroundStore")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

fn compile_into(
    hook: &dyn CompileHook,
    options: &serde_json::Value,
    file: &mut VirtualFile,
    errors: &mut Vec<String>,
) {
    match hook.compile(file, options) {
        Ok(output) => {
            file.set_compiled(output);
            errors.clear();
        }
        Err(messages) => {
            warn!("compiling {} failed: {}", file.filename(), messages.join("; "));
            *errors = messages;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{CompileResult, FnCompiler, NoopCompiler};
    use crate::file::CompiledOutput;
    use crate::import_map::RUNTIME_SPECIFIER;
    use parking_lot::Mutex;
    use serde_json::json;

    const RUNTIME: &str = "https://cdn.test/vue.js";

    fn options() -> StoreOptions {
        StoreOptions::new().default_runtime_url(RUNTIME)
    }

    fn recording() -> (impl CompileHook, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&calls);
        let hook = FnCompiler::new(
            move |file: &VirtualFile, _: &serde_json::Value| -> CompileResult {
                log.lock().push(file.filename().to_string());
                Ok(CompiledOutput {
                    js: format!("compiled:{}", file.code()),
                    ..CompiledOutput::default()
                })
            },
        );
        (hook, calls)
    }

    fn failing_on_oops() -> impl CompileHook {
        FnCompiler::new(|file: &VirtualFile, _: &serde_json::Value| -> CompileResult {
            if file.code().contains("oops") {
                Err(vec![format!("{}: unexpected token", file.filename())])
            } else {
                Ok(CompiledOutput::default())
            }
        })
    }

    fn share_link(files: serde_json::Value) -> String {
        format!("#{}", codec::utoa(&files.to_string()))
    }

    fn import_map_of(store: &PlaygroundStore) -> serde_json::Value {
        serde_json::from_str(store.files().get(IMPORT_MAP_FILE).unwrap().code()).unwrap()
    }

    #[test]
    fn test_default_construction() {
        let store = PlaygroundStore::new(options(), NoopCompiler).unwrap();
        let names: Vec<_> = store.files().filenames().collect();
        assert_eq!(names, [DEFAULT_MAIN_FILE, IMPORT_MAP_FILE, "fighting-design.js"]);
        assert!(store.files().get("fighting-design.js").unwrap().is_hidden());
        assert_eq!(store.main_file(), DEFAULT_MAIN_FILE);
        assert_eq!(store.active_file().unwrap().filename(), DEFAULT_MAIN_FILE);
        assert_eq!(store.active_file().unwrap().code(), DEFAULT_CODE);
        assert!(store.errors().is_empty());

        let map = import_map_of(&store);
        assert_eq!(map["imports"][RUNTIME_SPECIFIER], RUNTIME);
        assert_eq!(map["imports"]["fighting-design"], "./es/index.js");
    }

    #[test]
    fn test_construction_from_serialized_state() {
        let link = share_link(json!({"a.vue": "<template/>"}));
        let store = PlaygroundStore::new(options().serialized_state(link), NoopCompiler).unwrap();
        assert_eq!(store.files().get("a.vue").unwrap().code(), "<template/>");
        assert_eq!(store.main_file(), "a.vue");
        assert_eq!(store.active_file().unwrap().filename(), "a.vue");
        assert!(store.files().contains(IMPORT_MAP_FILE));
    }

    #[test]
    fn test_construction_prefers_conventional_entry() {
        let link = share_link(json!({"b.vue": "1", "App.vue": "2"}));
        let store = PlaygroundStore::new(options().serialized_state(link), NoopCompiler).unwrap();
        assert_eq!(store.main_file(), DEFAULT_MAIN_FILE);
    }

    #[test]
    fn test_construction_rejects_bad_link() {
        let err =
            PlaygroundStore::new(options().serialized_state("#%%%"), NoopCompiler).unwrap_err();
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_construction_compiles_every_file() {
        let (hook, calls) = recording();
        let link = share_link(json!({"a.vue": "x", "b.js": "y"}));
        let store = PlaygroundStore::new(options().serialized_state(link), hook).unwrap();

        assert_eq!(
            *calls.lock(),
            ["a.vue", "b.js", IMPORT_MAP_FILE, "fighting-design.js"]
        );
        assert_eq!(store.files().get("b.js").unwrap().compiled().js, "compiled:y");
    }

    #[test]
    fn test_show_helper_files() {
        let store = PlaygroundStore::new(options().show_helper_files(true), NoopCompiler).unwrap();
        assert!(!store.files().get("fighting-design.js").unwrap().is_hidden());
    }

    #[test]
    fn test_ensure_import_map_idempotent() {
        let mut store = PlaygroundStore::new(options(), NoopCompiler).unwrap();
        let before = store.files().get(IMPORT_MAP_FILE).unwrap().code().to_string();
        store.ensure_import_map();
        store.ensure_import_map();
        assert_eq!(store.files().get(IMPORT_MAP_FILE).unwrap().code(), before);
        assert_eq!(import_map_of(&store)["imports"]["vue"], RUNTIME);
    }

    #[test]
    fn test_ensure_import_map_repairs_runtime_entry() {
        let map = json!({"imports": {"lodash": "https://x/lodash.js", "d3": "https://x/d3.js"}});
        let link = share_link(json!({"App.vue": "", "import-map.json": map.to_string()}));
        let store = PlaygroundStore::new(options().serialized_state(link), NoopCompiler).unwrap();

        let text = store.files().get(IMPORT_MAP_FILE).unwrap().code();
        assert!(text.contains("\n  \"imports\""));
        let repaired: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(repaired["imports"]["vue"], RUNTIME);
        assert_eq!(repaired["imports"]["lodash"], "https://x/lodash.js");
        assert_eq!(repaired["imports"]["d3"], "https://x/d3.js");
        assert!(repaired["imports"].get("fighting-design").is_none());
    }

    #[test]
    fn test_ensure_import_map_reports_broken_map() {
        let link = share_link(json!({"App.vue": "", "import-map.json": "{not json"}));
        let store = PlaygroundStore::new(
            options().serialized_state(link).defer_compile(true),
            NoopCompiler,
        )
        .unwrap();

        assert_eq!(store.files().get(IMPORT_MAP_FILE).unwrap().code(), "{not json");
        assert_eq!(store.errors().len(), 1);
        assert!(store.errors()[0].starts_with("Syntax error in import-map.json"));
    }

    #[test]
    fn test_broken_map_reported_after_initial_compile() {
        let link = share_link(json!({"App.vue": "", "import-map.json": "{not json"}));
        let store = PlaygroundStore::new(options().serialized_state(link), NoopCompiler).unwrap();

        assert_eq!(store.files().get(IMPORT_MAP_FILE).unwrap().code(), "{not json");
        assert_eq!(store.errors().len(), 1);
        assert!(store.errors()[0].starts_with("Syntax error in import-map.json: "));
    }

    #[test]
    fn test_set_files_reports_broken_map() {
        let mut store = PlaygroundStore::new(options(), NoopCompiler).unwrap();
        assert!(store.errors().is_empty());

        store
            .set_files([("App.vue", ""), ("import-map.json", "{not json")], None)
            .unwrap();

        assert_eq!(store.files().get(IMPORT_MAP_FILE).unwrap().code(), "{not json");
        assert_eq!(store.errors().len(), 1);
        assert!(store.errors()[0].starts_with("Syntax error in import-map.json: "));
    }

    #[test]
    fn test_get_import_map_replaces_compile_errors() {
        let mut store = PlaygroundStore::new(options(), failing_on_oops()).unwrap();
        store.set_code(DEFAULT_MAIN_FILE, "oops").unwrap();
        assert_eq!(store.errors(), ["App.vue: unexpected token"]);

        store.set_code(IMPORT_MAP_FILE, "{not json").unwrap();
        assert!(store.get_import_map().is_empty());
        assert_eq!(store.errors().len(), 1);
        assert!(store.errors()[0].starts_with("Syntax error in import-map.json: "));

        // a clean compile clears it; the next lookup reports it again
        store.set_code(DEFAULT_MAIN_FILE, "fine").unwrap();
        assert!(store.errors().is_empty());
        assert!(store.get_import_map().is_empty());
        assert_eq!(store.errors().len(), 1);
    }

    #[test]
    fn test_get_import_map_syntax_error() {
        let mut store = PlaygroundStore::new(options(), NoopCompiler).unwrap();
        store.set_code(IMPORT_MAP_FILE, "{not json").unwrap();
        store.state.errors = vec!["old".into(), "older".into()];

        let map = store.get_import_map();
        assert!(map.is_empty());
        assert_eq!(store.errors().len(), 1);
        assert!(store.errors()[0].contains("Syntax error in import-map.json"));
    }

    #[test]
    fn test_get_import_map_ok() {
        let mut store = PlaygroundStore::new(options(), NoopCompiler).unwrap();
        let map = store.get_import_map();
        assert_eq!(map.runtime_url(), Some(RUNTIME));
        assert!(store.errors().is_empty());
    }

    #[test]
    fn test_set_files_replaces_everything() {
        let (hook, calls) = recording();
        let mut store = PlaygroundStore::new(options(), hook).unwrap();
        calls.lock().clear();

        store.set_files([("b.vue", "code")], Some("b.vue")).unwrap();

        let names: Vec<_> = store.files().filenames().collect();
        assert_eq!(names, ["b.vue", IMPORT_MAP_FILE]);
        assert_eq!(store.main_file(), "b.vue");
        assert_eq!(store.active_file().unwrap().filename(), "b.vue");
        assert_eq!(import_map_of(&store)["imports"]["vue"], RUNTIME);
        // b.vue before publishing, then again as the new active file
        assert_eq!(*calls.lock(), ["b.vue", "b.vue"]);
        assert_eq!(store.files().get("b.vue").unwrap().compiled().js, "compiled:code");
    }

    #[test]
    fn test_set_files_compiles_in_input_order() {
        let (hook, calls) = recording();
        let mut store = PlaygroundStore::new(options(), hook).unwrap();
        calls.lock().clear();

        store
            .set_files([("z.js", "1"), ("a.js", "2")], None)
            .unwrap();

        assert_eq!(store.main_file(), DEFAULT_MAIN_FILE);
        assert_eq!(store.files().get(DEFAULT_MAIN_FILE).unwrap().code(), DEFAULT_CODE);
        assert_eq!(
            *calls.lock(),
            [DEFAULT_MAIN_FILE, "z.js", "a.js", DEFAULT_MAIN_FILE]
        );
    }

    #[test]
    fn test_set_files_unknown_main_keeps_state() {
        let mut store = PlaygroundStore::new(options(), NoopCompiler).unwrap();
        let err = store.set_files([("a.vue", "")], Some("missing.vue")).unwrap_err();
        assert!(matches!(err, StoreError::UnknownFile(name) if name == "missing.vue"));
        assert_eq!(store.main_file(), DEFAULT_MAIN_FILE);
        assert!(store.files().contains("fighting-design.js"));
    }

    #[test]
    fn test_add_file_activation() {
        let mut store = PlaygroundStore::new(options(), NoopCompiler).unwrap();

        store.add_file(VirtualFile::new("secret.js", "").with_hidden(true));
        assert_eq!(store.active_file().unwrap().filename(), DEFAULT_MAIN_FILE);
        assert!(store.files().contains("secret.js"));

        store.add_file("Comp.vue");
        assert_eq!(store.active_file().unwrap().filename(), "Comp.vue");
        assert!(store.active_file().unwrap().code().is_empty());
    }

    #[test]
    fn test_add_file_overwrites() {
        let mut store = PlaygroundStore::new(options(), NoopCompiler).unwrap();
        store.add_file(VirtualFile::new(DEFAULT_MAIN_FILE, "<template>new</template>"));
        assert_eq!(store.files().len(), 3);
        assert_eq!(
            store.files().get(DEFAULT_MAIN_FILE).unwrap().code(),
            "<template>new</template>"
        );
        assert_eq!(
            store.active_file().unwrap().compiled().js,
            "<template>new</template>"
        );
    }

    #[test]
    fn test_set_active() {
        let mut store = PlaygroundStore::new(options(), NoopCompiler).unwrap();
        store.set_active(IMPORT_MAP_FILE).unwrap();
        assert_eq!(store.active_file().unwrap().filename(), IMPORT_MAP_FILE);

        let err = store.set_active("nope.vue").unwrap_err();
        assert!(matches!(err, StoreError::UnknownFile(_)));
        assert_eq!(store.active_file().unwrap().filename(), IMPORT_MAP_FILE);
    }

    #[test]
    fn test_subscription_fires_on_active_changes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut store = PlaygroundStore::new(options(), NoopCompiler).unwrap();
        let log = Arc::clone(&seen);
        let id = store.subscribe(move |file| {
            log.lock().push(format!("{}={}", file.filename(), file.compiled().js));
        });

        store.add_file(VirtualFile::new("a.vue", "A"));
        store.set_code("a.vue", "B").unwrap();
        store.set_code("a.vue", "B").unwrap();
        store.set_code(DEFAULT_MAIN_FILE, "not active").unwrap();
        store.set_active("a.vue").unwrap();

        assert_eq!(*seen.lock(), ["a.vue=A", "a.vue=B"]);

        assert!(store.unsubscribe(id));
        store.set_active(DEFAULT_MAIN_FILE).unwrap();
        assert_eq!(seen.lock().len(), 2);
    }

    #[test]
    fn test_deferred_compile() {
        let (hook, calls) = recording();
        let mut store = PlaygroundStore::new(options().defer_compile(true), hook).unwrap();
        store.add_file("x.vue");
        assert!(calls.lock().is_empty());

        store.init();
        assert_eq!(calls.lock()[0], "x.vue");
        assert!(calls.lock().contains(&IMPORT_MAP_FILE.to_string()));
    }

    #[test]
    fn test_compile_errors_replace_errors() {
        let mut store = PlaygroundStore::new(options(), failing_on_oops()).unwrap();
        assert!(store.errors().is_empty());

        store.set_code(DEFAULT_MAIN_FILE, "oops").unwrap();
        assert_eq!(store.errors(), ["App.vue: unexpected token"]);

        store.set_code(DEFAULT_MAIN_FILE, "fine").unwrap();
        assert!(store.errors().is_empty());
    }

    #[test]
    fn test_sfc_options_passed_to_hook() {
        let seen = Arc::new(Mutex::new(None));
        let log = Arc::clone(&seen);
        let hook = FnCompiler::new(
            move |_: &VirtualFile, options: &serde_json::Value| -> CompileResult {
                *log.lock() = Some(options.clone());
                Ok(CompiledOutput::default())
            },
        );
        let store = PlaygroundStore::new(
            options().sfc_options(json!({"script": {"inlineTemplate": true}})),
            hook,
        )
        .unwrap();
        assert_eq!(store.sfc_options()["script"]["inlineTemplate"], true);
        assert_eq!(seen.lock().as_ref().unwrap()["script"]["inlineTemplate"], true);
    }

    #[test]
    fn test_delete_file() {
        let mut store = PlaygroundStore::new(options(), NoopCompiler).unwrap();
        store.add_file(VirtualFile::new("Comp.vue", "c"));

        assert!(!store.delete_file(IMPORT_MAP_FILE));
        assert!(!store.delete_file("fighting-design.js"));
        assert!(store.files().contains("fighting-design.js"));
        assert!(!store.delete_file("missing.vue"));

        assert!(store.delete_file("Comp.vue"));
        assert_eq!(store.active_file().unwrap().filename(), DEFAULT_MAIN_FILE);

        store.add_file(VirtualFile::new("Other.vue", "o"));
        assert!(store.delete_file(DEFAULT_MAIN_FILE));
        assert_eq!(store.main_file(), "Other.vue");
        assert_eq!(store.active_file().unwrap().filename(), "Other.vue");

        assert!(store.delete_file("Other.vue"));
        assert!(store.files().contains(store.main_file()));
        assert_eq!(store.active_file().unwrap().filename(), store.main_file());
    }

    #[test]
    fn test_delete_skips_visible_helper_as_entry() {
        let mut store =
            PlaygroundStore::new(options().show_helper_files(true), NoopCompiler).unwrap();
        store.add_file(VirtualFile::new("Other.vue", "o"));

        assert!(store.delete_file(DEFAULT_MAIN_FILE));
        assert_eq!(store.main_file(), "Other.vue");
        assert!(!store.delete_file("fighting-design.js"));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let mut store = PlaygroundStore::new(options(), NoopCompiler).unwrap();
        store.add_file(VirtualFile::new("Comp.vue", "<template>ü</template>"));

        let link = store.serialize().unwrap();
        assert!(link.starts_with('#'));

        let restored =
            PlaygroundStore::new(options().serialized_state(link), NoopCompiler).unwrap();
        assert_eq!(restored.get_files(), store.get_files());
        assert_eq!(restored.main_file(), DEFAULT_MAIN_FILE);
    }

    #[test]
    fn test_get_files_drops_metadata() {
        let store = PlaygroundStore::new(options(), NoopCompiler).unwrap();
        let files = store.get_files();
        assert_eq!(files.len(), 3);
        assert_eq!(files[DEFAULT_MAIN_FILE], DEFAULT_CODE);
    }

    #[test]
    fn test_set_runtime_url() {
        let mut store = PlaygroundStore::new(options(), NoopCompiler).unwrap();
        store.set_runtime_url("https://cdn.test/vue@next.js");
        assert_eq!(store.runtime_url(), "https://cdn.test/vue@next.js");
        assert_eq!(
            import_map_of(&store)["imports"]["vue"],
            "https://cdn.test/vue@next.js"
        );
    }

    #[test]
    fn test_initial_output_options() {
        let store = PlaygroundStore::new(
            options().show_output(true).output_mode(OutputMode::Css),
            NoopCompiler,
        )
        .unwrap();
        assert!(store.initial_show_output());
        assert_eq!(store.initial_output_mode(), OutputMode::Css);
        assert_eq!(store.state().companion_url(), "./es/index.js");
    }

    #[test]
    fn test_shared_store() {
        let shared = PlaygroundStore::new(options(), NoopCompiler).unwrap().into_shared();
        shared.write().add_file("Shared.vue");
        assert_eq!(
            shared.read().active_file().unwrap().filename(),
            "Shared.vue"
        );
    }
}
