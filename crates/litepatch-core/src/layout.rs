//! Data-file location for generated code
//!
//! The generated database bootstrap and seed script must find the same
//! SQLite file whether they run from the source tree or from the compiled
//! build output. Both ask the same question: walk up from the module's own
//! directory to the package root, and if that directory is the build-output
//! marker, go one level higher. The Rust implementation here and the
//! TypeScript it emits must stay in lockstep.

use std::path::{Path, PathBuf};

/// Directory name of the compiled output tree
pub const BUILD_OUTPUT_MARKER: &str = "dist";

/// Database file, relative to the package root
pub const DATA_FILE: &str = "data/database.db";

/// Resolves the database file for a module at a known depth below the package root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFileLocator {
    marker: String,
    data_file: String,
}

impl DataFileLocator {
    pub fn new(marker: impl Into<String>, data_file: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            data_file: data_file.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn data_file(&self) -> &str {
        &self.data_file
    }

    /// Package root for a module living `depth` directories below it
    ///
    /// Lexical only; nothing is read from disk.
    pub fn package_root(&self, module_dir: &Path, depth: usize) -> PathBuf {
        let candidate = ascend(module_dir, depth);

        let is_build_output = candidate
            .file_name()
            .map(|name| name == self.marker.as_str())
            .unwrap_or(false);

        if is_build_output {
            ascend(&candidate, 1)
        } else {
            candidate
        }
    }

    /// Full path of the database file
    pub fn resolve(&self, module_dir: &Path, depth: usize) -> PathBuf {
        self.package_root(module_dir, depth).join(&self.data_file)
    }

    /// TypeScript statements computing `dbPath` the same way [`Self::resolve`] does
    ///
    /// The first line carries no indentation; callers indent the rest.
    pub fn render_typescript(&self, depth: usize) -> String {
        let candidate = js_string(&relative_ascent(depth));
        let above = js_string(&relative_ascent(depth + 1));

        format!(
            "const packageRoot = path.basename(path.resolve(__dirname, {candidate})) === {marker}\n  \
             ? path.resolve(__dirname, {above})\n  \
             : path.resolve(__dirname, {candidate});\n\
             const dbPath = path.resolve(packageRoot, {data_file});",
            candidate = candidate,
            above = above,
            marker = js_string(&self.marker),
            data_file = js_string(&self.data_file),
        )
    }
}

impl Default for DataFileLocator {
    fn default() -> Self {
        Self::new(BUILD_OUTPUT_MARKER, DATA_FILE)
    }
}

fn ascend(path: &Path, levels: usize) -> PathBuf {
    let mut current = path;
    for _ in 0..levels {
        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }
    current.to_path_buf()
}

/// "." for zero levels, otherwise "..", "../..", ...
fn relative_ascent(levels: usize) -> String {
    if levels == 0 {
        ".".to_string()
    } else {
        vec![".."; levels].join("/")
    }
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
