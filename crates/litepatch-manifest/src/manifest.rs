//! Manifest patching
//!
//! Structured field-level edit of a package manifest. Everything else in the
//! file is preserved, including key order.

use litepatch_core::ManifestSettings;
use serde_json::{Map, Value};
use std::path::Path;

const DEPENDENCIES: &str = "dependencies";
const DEV_DEPENDENCIES: &str = "devDependencies";

/// Result of patching a manifest file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// File rewritten
    Patched,

    /// File already carried the swap; not rewritten
    Unchanged,

    /// File does not exist; not created
    Skipped,
}

/// Dependency swap applied to a package manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestPatch {
    /// Keys removed from `dependencies`
    pub remove: Vec<String>,

    /// Entries inserted into `dependencies`
    pub dependencies: Vec<(String, String)>,

    /// Entries inserted into `devDependencies`
    pub dev_dependencies: Vec<(String, String)>,
}

impl ManifestPatch {
    /// Build a patch from config settings
    pub fn from_settings(settings: &ManifestSettings) -> Self {
        Self {
            remove: settings.remove.clone(),
            dependencies: settings
                .dependencies
                .iter()
                .map(|(name, version)| (name.clone(), version.clone()))
                .collect(),
            dev_dependencies: settings
                .dev_dependencies
                .iter()
                .map(|(name, version)| (name.clone(), version.clone()))
                .collect(),
        }
    }

    /// Apply the swap to an already parsed manifest
    pub fn apply(&self, manifest: &mut Value) -> Result<(), ManifestError> {
        let root = manifest
            .as_object_mut()
            .ok_or_else(|| ManifestError::Shape("manifest root is not a JSON object".to_string()))?;

        if let Some(existing) = root.get_mut(DEPENDENCIES) {
            if let Some(deps) = section_object(existing, DEPENDENCIES)? {
                for key in &self.remove {
                    // shift_remove keeps the remaining keys in place
                    if deps.shift_remove(key).is_some() {
                        tracing::debug!(dependency = %key, "removed dependency");
                    }
                }
            }
        }

        let deps = ensure_section(root, DEPENDENCIES)?;
        for (name, version) in &self.dependencies {
            deps.insert(name.clone(), Value::String(version.clone()));
        }

        let dev_deps = ensure_section(root, DEV_DEPENDENCIES)?;
        for (name, version) in &self.dev_dependencies {
            dev_deps.insert(name.clone(), Value::String(version.clone()));
        }

        Ok(())
    }

    /// Patch manifest text, returning the new text
    ///
    /// Output uses two-space indentation and keeps the input's trailing
    /// newline convention.
    pub fn patch_str(&self, contents: &str) -> Result<String, ManifestError> {
        let mut manifest: Value = serde_json::from_str(contents)
            .map_err(|e| ManifestError::Parse(e.to_string()))?;

        self.apply(&mut manifest)?;

        let mut patched = serde_json::to_string_pretty(&manifest)
            .map_err(|e| ManifestError::Parse(e.to_string()))?;

        if contents.ends_with('\n') {
            patched.push('\n');
        }

        Ok(patched)
    }

    /// Patch a manifest file in place
    pub fn apply_to_file(&self, path: &Path) -> Result<PatchOutcome, ManifestError> {
        let Some((contents, patched)) = self.patched_contents(path)? else {
            return Ok(PatchOutcome::Skipped);
        };

        if patched == contents {
            return Ok(PatchOutcome::Unchanged);
        }

        std::fs::write(path, patched)
            .map_err(|e| ManifestError::Io(path.display().to_string(), e.to_string()))?;

        Ok(PatchOutcome::Patched)
    }

    /// Outcome `apply_to_file` would report, without writing anything
    pub fn preview(&self, path: &Path) -> Result<PatchOutcome, ManifestError> {
        match self.patched_contents(path)? {
            None => Ok(PatchOutcome::Skipped),
            Some((contents, patched)) if patched == contents => Ok(PatchOutcome::Unchanged),
            Some(_) => Ok(PatchOutcome::Patched),
        }
    }

    /// Current and patched text, or `None` when the file does not exist
    fn patched_contents(&self, path: &Path) -> Result<Option<(String, String)>, ManifestError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "manifest not found, skipping");
                return Ok(None);
            }
            Err(e) => return Err(ManifestError::Io(path.display().to_string(), e.to_string())),
        };

        let patched = self.patch_str(&contents)?;
        Ok(Some((contents, patched)))
    }
}

impl Default for ManifestPatch {
    fn default() -> Self {
        Self::from_settings(&ManifestSettings::default())
    }
}

/// Borrow a dependency section as an object; `null` counts as absent
fn section_object<'a>(value: &'a mut Value, name: &str) -> Result<Option<&'a mut Map<String, Value>>, ManifestError> {
    match value {
        Value::Object(map) => Ok(Some(map)),
        Value::Null => Ok(None),
        other => Err(ManifestError::Shape(format!(
            "\"{}\" must be an object, found {}",
            name,
            json_type(other)
        ))),
    }
}

/// Get a dependency section, appending an empty one when missing
fn ensure_section<'a>(root: &'a mut Map<String, Value>, name: &str) -> Result<&'a mut Map<String, Value>, ManifestError> {
    let entry = root
        .entry(name.to_string())
        .or_insert_with(|| Value::Object(Map::new()));

    if entry.is_null() {
        *entry = Value::Object(Map::new());
    }

    match entry {
        Value::Object(map) => Ok(map),
        other => Err(ManifestError::Shape(format!(
            "\"{}\" must be an object, found {}",
            name,
            json_type(other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Manifest patching errors
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to access manifest file {0}: {1}")]
    Io(String, String),

    #[error("Failed to parse manifest JSON: {0}")]
    Parse(String),

    #[error("Unexpected manifest structure: {0}")]
    Shape(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn swaps_postgres_for_sqlite() {
        let mut manifest = json!({
            "name": "@growserver/db",
            "dependencies": { "drizzle-orm": "^0.33.0", "postgres": "^3.4.4" }
        });

        ManifestPatch::default().apply(&mut manifest).unwrap();

        assert_eq!(
            manifest,
            json!({
                "name": "@growserver/db",
                "dependencies": { "drizzle-orm": "^0.33.0", "better-sqlite3": "^11.0.0" },
                "devDependencies": { "@types/better-sqlite3": "^7.6.0" }
            })
        );
    }

    #[test]
    fn removal_keeps_key_order() {
        let patched = ManifestPatch::default()
            .patch_str(r#"{"dependencies":{"a":"1","postgres":"3","z":"2"}}"#)
            .unwrap();

        let a = patched.find("\"a\"").unwrap();
        let z = patched.find("\"z\"").unwrap();
        let sqlite = patched.find("\"better-sqlite3\"").unwrap();
        assert!(a < z && z < sqlite);
        assert!(!patched.contains("postgres"));
    }

    #[test]
    fn creates_missing_sections() {
        let patched = ManifestPatch::default().patch_str(r#"{"name":"db"}"#).unwrap();

        assert_eq!(
            patched,
            "{\n  \"name\": \"db\",\n  \"dependencies\": {\n    \"better-sqlite3\": \"^11.0.0\"\n  },\n  \"devDependencies\": {\n    \"@types/better-sqlite3\": \"^7.6.0\"\n  }\n}"
        );
    }

    #[test]
    fn null_sections_are_replaced() {
        let mut manifest = json!({ "dependencies": null, "devDependencies": null });
        ManifestPatch::default().apply(&mut manifest).unwrap();

        assert_eq!(manifest["dependencies"]["better-sqlite3"], "^11.0.0");
        assert_eq!(manifest["devDependencies"]["@types/better-sqlite3"], "^7.6.0");
    }

    #[test]
    fn patch_is_idempotent() {
        let patch = ManifestPatch::default();
        let once = patch
            .patch_str("{\n  \"dependencies\": {\n    \"postgres\": \"^3.4.4\"\n  }\n}\n")
            .unwrap();
        let twice = patch.patch_str(&once).unwrap();

        assert_eq!(once, twice);
        assert!(once.ends_with("}\n"));
    }

    #[test]
    fn existing_entries_are_overwritten_in_place() {
        let patched = ManifestPatch::default()
            .patch_str(r#"{"dependencies":{"better-sqlite3":"^9.0.0","zod":"^3"}}"#)
            .unwrap();

        let sqlite = patched.find("\"better-sqlite3\": \"^11.0.0\"").unwrap();
        let zod = patched.find("\"zod\"").unwrap();
        assert!(sqlite < zod);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = ManifestPatch::default().patch_str("{ \"dependencies\": ").unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));
    }

    #[test]
    fn rejects_non_object_root() {
        let err = ManifestPatch::default().patch_str("[1, 2]").unwrap_err();
        assert!(matches!(err, ManifestError::Shape(_)));
    }

    #[test]
    fn rejects_non_object_dependencies() {
        let err = ManifestPatch::default()
            .patch_str(r#"{"dependencies":["postgres"]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("\"dependencies\" must be an object, found an array"));
    }
}
