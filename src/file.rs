//! Virtual files and the ordered file set.
//!
//! ```text
//! FileSet (insertion-ordered)
//! └── IndexMap<String, VirtualFile>
//!     └── VirtualFile
//!         ├── filename
//!         ├── code        ── user-editable source
//!         ├── hidden      ── excluded from user listings
//!         └── compiled    ── cache written by the compile hook
//! ```

use indexmap::IndexMap;

/// Conventional name of the import map file.
pub const IMPORT_MAP_FILE: &str = "import-map.json";

/// Output cached on a file by the compile hook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledOutput {
    /// Client JavaScript.
    pub js: String,
    /// Extracted CSS.
    pub css: String,
    /// Server-rendering JavaScript.
    pub ssr: String,
}

impl CompiledOutput {
    /// Check if nothing has been compiled yet.
    pub fn is_empty(&self) -> bool {
        self.js.is_empty() && self.css.is_empty() && self.ssr.is_empty()
    }
}

/// An in-memory named unit of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualFile {
    filename: String,
    code: String,
    hidden: bool,
    compiled: CompiledOutput,
}

impl VirtualFile {
    /// Create a visible file.
    pub fn new(filename: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            code: code.into(),
            hidden: false,
            compiled: CompiledOutput::default(),
        }
    }

    /// Create an empty visible file.
    pub fn empty(filename: impl Into<String>) -> Self {
        Self::new(filename, String::new())
    }

    /// Set whether the file is hidden from user listings.
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// File name (the key in its [`FileSet`]).
    #[inline]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Source text.
    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Whether the file is excluded from user listings.
    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Last compile hook output.
    #[inline]
    pub fn compiled(&self) -> &CompiledOutput {
        &self.compiled
    }

    /// Replace the source text. Returns `true` if it changed.
    pub(crate) fn set_code(&mut self, code: impl Into<String>) -> bool {
        let code = code.into();
        if self.code == code {
            return false;
        }
        self.code = code;
        true
    }

    pub(crate) fn set_compiled(&mut self, compiled: CompiledOutput) {
        self.compiled = compiled;
    }
}

impl From<&str> for VirtualFile {
    fn from(filename: &str) -> Self {
        Self::empty(filename)
    }
}

impl From<String> for VirtualFile {
    fn from(filename: String) -> Self {
        Self::empty(filename)
    }
}

/// Insertion-ordered mapping from filename to [`VirtualFile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    files: IndexMap<String, VirtualFile>,
}

impl FileSet {
    /// Create an empty file set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a file set from filename → source pairs, in iteration order.
    pub fn from_sources<I, K, V>(sources: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut set = Self::new();
        for (filename, code) in sources {
            set.insert(VirtualFile::new(filename, code));
        }
        set
    }

    /// Insert a file under its own name, replacing any previous file.
    ///
    /// A replaced file keeps its position in the order.
    pub fn insert(&mut self, file: VirtualFile) -> Option<VirtualFile> {
        self.files.insert(file.filename.clone(), file)
    }

    /// Remove a file, keeping the order of the remaining files.
    pub fn remove(&mut self, filename: &str) -> Option<VirtualFile> {
        self.files.shift_remove(filename)
    }

    /// Look up a file.
    #[inline]
    pub fn get(&self, filename: &str) -> Option<&VirtualFile> {
        self.files.get(filename)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, filename: &str) -> Option<&mut VirtualFile> {
        self.files.get_mut(filename)
    }

    /// Check if a file exists.
    #[inline]
    pub fn contains(&self, filename: &str) -> bool {
        self.files.contains_key(filename)
    }

    /// Number of files, hidden ones included.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// First filename in insertion order.
    pub fn first_filename(&self) -> Option<&str> {
        self.files.keys().next().map(String::as_str)
    }

    /// Iterate over all filenames in order.
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Iterate over all files in order.
    pub fn iter(&self) -> impl Iterator<Item = &VirtualFile> {
        self.files.values()
    }

    /// Iterate over files shown to the user.
    pub fn visible(&self) -> impl Iterator<Item = &VirtualFile> {
        self.files.values().filter(|f| !f.hidden)
    }

    /// Project to filename → source, dropping metadata.
    pub fn sources(&self) -> IndexMap<String, String> {
        self.files
            .iter()
            .map(|(name, file)| (name.clone(), file.code.clone()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a VirtualFile;
    type IntoIter = indexmap::map::Values<'a, String, VirtualFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.values()
    }
}
