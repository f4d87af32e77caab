//! Patch run orchestration
//!
//! Runs the manifest patch, then writes every catalog artifact in order.
//! A failing step is recorded and logged; it never stops the steps after it.

use litepatch_core::{Config, FailureKind, Outcome, RunReport, StepRecord};
use litepatch_manifest::{ManifestError, ManifestPatch, PatchOutcome};
use litepatch_templates::{ArtifactSpec, TemplateCatalog};
use std::path::{Path, PathBuf};

use crate::writer::PathWriter;

/// Step name recorded for the manifest patch
pub const MANIFEST_STEP: &str = "manifest";

/// Step name recorded when the catalog fails to render
const RENDER_STEP: &str = "templates";

/// Drives one patch run against a workspace
pub struct Orchestrator {
    config: Config,
    writer: PathWriter,
    catalog: TemplateCatalog,
    dry_run: bool,
}

impl Orchestrator {
    /// Create an orchestrator for the workspace rooted at `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>, config: Config) -> Self {
        let writer = PathWriter::new(base_dir).with_atomic(config.atomic_writes);

        Self {
            config,
            writer,
            catalog: TemplateCatalog::default(),
            dry_run: false,
        }
    }

    /// Use a specific catalog (e.g. one with a custom locator)
    pub fn with_catalog(mut self, catalog: TemplateCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Record what would happen without touching any file
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn base_dir(&self) -> &Path {
        self.writer.base_dir()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every step and return the report
    pub fn run(&self) -> RunReport {
        self.run_with_progress(|_| {})
    }

    /// Run every step, handing each record to `progress` as soon as it is known
    pub fn run_with_progress<F>(&self, mut progress: F) -> RunReport
    where
        F: FnMut(&StepRecord),
    {
        let mut report = RunReport::new();
        let mut record = |step: StepRecord| {
            if let Outcome::Failed { kind, cause } = &step.outcome {
                tracing::warn!(step = %step.step, path = %step.path, kind = %kind, "{}", cause);
            }
            progress(&step);
            report.push(step);
        };

        tracing::debug!(base_dir = %self.base_dir().display(), dry_run = self.dry_run, "starting patch run");

        record(self.patch_manifest());

        match self.catalog.render_all() {
            Ok(artifacts) => {
                for artifact in &artifacts {
                    record(self.write_artifact(artifact));
                }
            }
            Err(e) => {
                // Nothing consistent to write if any body failed to render
                record(StepRecord::failed(RENDER_STEP, "", FailureKind::TemplateRender, e.to_string()));
            }
        }

        report
    }

    fn patch_manifest(&self) -> StepRecord {
        let relative = self.config.manifest.path.as_str();

        let path = match self.writer.resolve(relative) {
            Ok(path) => path,
            Err(e) => {
                return StepRecord::failed(MANIFEST_STEP, relative, FailureKind::ManifestIo, e.to_string());
            }
        };

        let patch = ManifestPatch::from_settings(&self.config.manifest);
        let result = if self.dry_run {
            patch.preview(&path)
        } else {
            patch.apply_to_file(&path)
        };

        match result {
            Ok(PatchOutcome::Patched) if self.dry_run => StepRecord::new(MANIFEST_STEP, relative, Outcome::Planned),
            Ok(PatchOutcome::Patched) => {
                tracing::info!(path = relative, "Updated {}", relative);
                StepRecord::new(MANIFEST_STEP, relative, Outcome::Patched)
            }
            Ok(PatchOutcome::Unchanged) => StepRecord::new(MANIFEST_STEP, relative, Outcome::Unchanged),
            Ok(PatchOutcome::Skipped) => StepRecord::new(MANIFEST_STEP, relative, Outcome::Skipped),
            Err(e) => StepRecord::failed(MANIFEST_STEP, relative, failure_kind(&e), e.to_string()),
        }
    }

    fn write_artifact(&self, artifact: &ArtifactSpec) -> StepRecord {
        let step = artifact.name.as_str();
        let relative = artifact.destination.as_str();

        let result = if self.dry_run {
            self.writer.resolve(relative).map(|_| Outcome::Planned)
        } else {
            self.writer
                .write(relative, &artifact.content)
                .map(|_| Outcome::Written)
        };

        match result {
            Ok(outcome) => StepRecord::new(step, relative, outcome),
            Err(e) => StepRecord::failed(step, relative, FailureKind::Write, e.to_string()),
        }
    }
}

fn failure_kind(error: &ManifestError) -> FailureKind {
    match error {
        ManifestError::Io(..) => FailureKind::ManifestIo,
        ManifestError::Parse(_) => FailureKind::ManifestParse,
        ManifestError::Shape(_) => FailureKind::ManifestShape,
    }
}
