//! Configuration for playground stores.
//!
//! Two layers:
//!
//! - [`Config`]: process-wide defaults (runtime version, CDN). Set once at
//!   startup with [`ConfigBuilder`].
//! - [`StoreOptions`]: per-store construction options.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use indexmap::IndexMap;

use crate::error::StoreError;

/// Global configuration, initialized via [`ConfigBuilder::init`].
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Framework runtime version used when none is configured.
pub const DEFAULT_RUNTIME_VERSION: &str = "3.3.4";

/// CDN used when none is configured.
pub const DEFAULT_CDN_BASE: &str = "https://unpkg.com";

/// Process-wide defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Framework version templated into the default runtime URL.
    /// Example: "3.3.4"
    pub runtime_version: String,
    /// CDN origin serving the runtime bundle, without trailing slash.
    pub cdn_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runtime_version: DEFAULT_RUNTIME_VERSION.to_string(),
            cdn_base: DEFAULT_CDN_BASE.to_string(),
        }
    }
}

impl Config {
    /// URL of the browser ESM build of the framework runtime.
    pub fn default_runtime_url(&self) -> String {
        format!(
            "{}/@vue/runtime-dom@{}/dist/runtime-dom.esm-browser.js",
            self.cdn_base.trim_end_matches('/'),
            self.runtime_version
        )
    }
}

/// Configuration builder for fluent API.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    runtime_version: Option<String>,
    cdn_base: Option<String>,
}

impl ConfigBuilder {
    /// Create a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the framework runtime version.
    ///
    /// Default: [`DEFAULT_RUNTIME_VERSION`]
    ///
    /// # Example
    ///
    /// ```
    /// use playground_store::config::ConfigBuilder;
    ///
    /// ConfigBuilder::new()
    ///     .runtime_version("3.4.0")
    ///     .init();
    /// ```
    pub fn runtime_version(mut self, version: impl Into<String>) -> Self {
        self.runtime_version = Some(version.into());
        self
    }

    /// Set the CDN origin.
    ///
    /// Default: [`DEFAULT_CDN_BASE`]
    pub fn cdn_base(mut self, base: impl Into<String>) -> Self {
        self.cdn_base = Some(base.into());
        self
    }

    /// Build the configuration without installing it.
    pub fn build(self) -> Config {
        let defaults = Config::default();
        Config {
            runtime_version: self.runtime_version.unwrap_or(defaults.runtime_version),
            cdn_base: self.cdn_base.unwrap_or(defaults.cdn_base),
        }
    }

    /// Build and initialize the global configuration.
    ///
    /// This can only be called once. Subsequent calls are ignored.
    /// Returns `true` if configuration was set, `false` if already initialized.
    pub fn init(self) -> bool {
        CONFIG.set(self.build()).is_ok()
    }
}

/// Get the current configuration, or default if not initialized.
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

// =============================================================================
// OutputMode
// =============================================================================

/// Which compiled artifact the output pane shows first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputMode {
    /// Rendered preview in the sandbox.
    #[default]
    Preview,
    /// Compiled client JavaScript.
    Js,
    /// Extracted CSS.
    Css,
    /// Server-rendering JavaScript.
    Ssr,
}

impl OutputMode {
    /// Name used in URLs and UI state.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preview => "preview",
            Self::Js => "js",
            Self::Css => "css",
            Self::Ssr => "ssr",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preview" => Ok(Self::Preview),
            "js" => Ok(Self::Js),
            "css" => Ok(Self::Css),
            "ssr" => Ok(Self::Ssr),
            other => Err(StoreError::OutputMode(other.to_string())),
        }
    }
}

// =============================================================================
// CompanionLibrary
// =============================================================================

/// A UI component library wired into every sandbox.
///
/// Contributes one helper file (installing the library into the app) and a
/// set of bare-specifier mappings for the import map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionLibrary {
    /// Name of the injected helper file.
    pub plugin_file: String,
    /// Source of the injected helper file.
    pub plugin_code: String,
    /// Base URL the library bundle is served from, with trailing slash.
    pub public_path: String,
    /// Extra import map entries, in insertion order.
    pub imports: IndexMap<String, String>,
}

impl CompanionLibrary {
    /// Entry module URL of the bundled library.
    pub fn entry_url(&self) -> String {
        format!("{}es/index.js", self.public_path)
    }

    /// The Fighting Design component library served from the playground itself.
    pub fn fighting_design(public_path: impl Into<String>) -> Self {
        let public_path = public_path.into();
        let mut imports = IndexMap::new();
        imports.insert(
            "fighting-design".to_string(),
            format!("{public_path}es/index.js"),
        );
        imports.insert(
            "@fighting-design/fighting-icon".to_string(),
            format!("{public_path}icon/index.js"),
        );
        Self {
            plugin_file: "fighting-design.js".to_string(),
            plugin_code: FIGHTING_PLUGIN_CODE.to_string(),
            public_path,
            imports,
        }
    }
}

impl Default for CompanionLibrary {
    fn default() -> Self {
        Self::fighting_design("./")
    }
}

const FIGHTING_PLUGIN_CODE: &str = r#"import { getCurrentInstance } from 'vue'
import FightingDesign from 'fighting-design'

let installed = false
await loadStyle()

export function setupFightingDesign() {
  if (installed) return
  const instance = getCurrentInstance()
  instance.appContext.app.use(FightingDesign)
  installed = true
}

export function loadStyle() {
  return new Promise((resolve, reject) => {
    const link = document.createElement('link')
    link.rel = 'stylesheet'
    link.href = './es/style.css'
    link.addEventListener('load', resolve)
    link.addEventListener('error', reject)
    document.body.append(link)
  })
}
"#;

// =============================================================================
// StoreOptions
// =============================================================================

/// Construction options for a [`PlaygroundStore`](crate::store::PlaygroundStore).
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Encoded file set from a share link (empty: start from defaults).
    pub serialized_state: String,
    /// Module URL the `vue` specifier resolves to.
    pub default_runtime_url: String,
    /// Whether the output pane starts open.
    pub show_output: bool,
    /// Initial output pane mode.
    pub output_mode: OutputMode,
    /// Whether the injected helper file is listed to the user.
    pub show_helper_files: bool,
    /// Companion library wired into the sandbox.
    pub companion: CompanionLibrary,
    /// Compiler options handed to the compile hook untouched.
    pub sfc_options: serde_json::Value,
    /// Hold off compiling until [`init`](crate::store::PlaygroundStore::init).
    pub defer_compile: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            serialized_state: String::new(),
            default_runtime_url: get().default_runtime_url(),
            show_output: false,
            output_mode: OutputMode::Preview,
            show_helper_files: false,
            companion: CompanionLibrary::default(),
            sfc_options: serde_json::Value::Null,
            defer_compile: false,
        }
    }
}

impl StoreOptions {
    /// Create options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore files from a share link. A leading `#` is accepted.
    pub fn serialized_state(mut self, state: impl Into<String>) -> Self {
        self.serialized_state = state.into();
        self
    }

    /// Override the runtime module URL.
    pub fn default_runtime_url(mut self, url: impl Into<String>) -> Self {
        self.default_runtime_url = url.into();
        self
    }

    /// Open the output pane initially.
    pub fn show_output(mut self, show: bool) -> Self {
        self.show_output = show;
        self
    }

    /// Set the initial output mode.
    pub fn output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    /// Set the initial output mode by name (`"preview"`, `"js"`, `"css"`, `"ssr"`).
    pub fn output_mode_str(self, mode: &str) -> Result<Self, StoreError> {
        Ok(self.output_mode(mode.parse()?))
    }

    /// List injected helper files to the user (useful while developing the playground).
    pub fn show_helper_files(mut self, show: bool) -> Self {
        self.show_helper_files = show;
        self
    }

    /// Replace the companion library.
    pub fn companion(mut self, companion: CompanionLibrary) -> Self {
        self.companion = companion;
        self
    }

    /// Set compiler options passed through to the compile hook.
    pub fn sfc_options(mut self, options: serde_json::Value) -> Self {
        self.sfc_options = options;
        self
    }

    /// Defer the first compilation until `init()` is called.
    pub fn defer_compile(mut self, defer: bool) -> Self {
        self.defer_compile = defer;
        self
    }
}
