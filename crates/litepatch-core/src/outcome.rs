//! Step outcomes recorded by a patch run
//!
//! IMPORTANT: failure kind strings end up in saved reports.
//! NEVER rename or remove kinds - add new ones instead.

use serde::{Deserialize, Serialize};

/// Failure kind registry (v1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    /// The manifest exists but could not be read or written
    ManifestIo,

    /// The manifest is not valid JSON
    ManifestParse,

    /// The manifest is valid JSON but not shaped like a package manifest
    ManifestShape,

    /// A template failed to render
    TemplateRender,

    /// Directory creation or file write failed for an artifact
    Write,
}

impl FailureKind {
    /// Get the failure kind as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManifestIo => "MANIFEST_IO",
            Self::ManifestParse => "MANIFEST_PARSE",
            Self::ManifestShape => "MANIFEST_SHAPE",
            Self::TemplateRender => "TEMPLATE_RENDER",
            Self::Write => "WRITE",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What happened to a single step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Artifact written (full overwrite)
    Written,

    /// Manifest rewritten with the dependency swap
    Patched,

    /// Manifest already carried the swap; file left untouched
    Unchanged,

    /// Manifest absent; nothing to do
    Skipped,

    /// Dry run: the step would have touched this path
    Planned,

    /// The step failed; later steps still ran
    Failed {
        kind: FailureKind,
        cause: String,
    },
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Written => write!(f, "written"),
            Self::Patched => write!(f, "patched"),
            Self::Unchanged => write!(f, "unchanged"),
            Self::Skipped => write!(f, "skipped"),
            Self::Planned => write!(f, "planned"),
            Self::Failed { kind, cause } => write!(f, "failed ({}): {}", kind, cause),
        }
    }
}

/// One entry in the run report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Logical step name (e.g. "manifest", "player schema")
    pub step: String,

    /// Target path relative to the workspace root
    pub path: String,

    /// Result of the step
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl StepRecord {
    pub fn new(step: impl Into<String>, path: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            step: step.into(),
            path: path.into(),
            outcome,
        }
    }

    /// Shorthand for a failed step
    pub fn failed(
        step: impl Into<String>,
        path: impl Into<String>,
        kind: FailureKind,
        cause: impl Into<String>,
    ) -> Self {
        Self::new(step, path, Outcome::Failed { kind, cause: cause.into() })
    }
}
