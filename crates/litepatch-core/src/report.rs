//! Run report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};
use crate::outcome::{Outcome, StepRecord};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Summary statistics for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total number of steps
    pub total: usize,

    /// Artifacts written or manifest patched
    pub applied: usize,

    /// Steps that needed no change (skipped or unchanged)
    pub untouched: usize,

    /// Steps recorded by a dry run
    pub planned: usize,

    /// Failed steps
    pub failed: usize,
}

impl ReportSummary {
    fn count(&mut self, outcome: &Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Written | Outcome::Patched => self.applied += 1,
            Outcome::Unchanged | Outcome::Skipped => self.untouched += 1,
            Outcome::Planned => self.planned += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Ordered record of everything a run did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Summary statistics
    pub summary: ReportSummary,

    /// Steps in execution order
    pub steps: Vec<StepRecord>,
}

impl RunReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: ReportSummary::default(),
            steps: Vec::new(),
        }
    }

    /// Create a report from already collected steps
    pub fn from_steps(steps: Vec<StepRecord>) -> Self {
        let mut report = Self::new();
        for step in steps {
            report.push(step);
        }
        report
    }

    /// Append a step, keeping the summary in sync
    pub fn push(&mut self, step: StepRecord) {
        self.summary.count(&step.outcome);
        self.steps.push(step);
    }

    /// Check if any step failed
    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }

    /// Failed steps, in execution order
    pub fn failures(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(|s| s.outcome.is_failure())
    }

    /// Look up the record for a target path
    pub fn step_for(&self, path: &str) -> Option<&StepRecord> {
        self.steps.iter().find(|s| s.path == path)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::FailureKind;

    #[test]
    fn empty_report() {
        let report = RunReport::new();
        assert_eq!(report.version, ReportVersion::CURRENT);
        assert_eq!(report.summary.total, 0);
        assert!(!report.has_failures());
    }

    #[test]
    fn report_counts_outcomes() {
        let report = RunReport::from_steps(vec![
            StepRecord::new("manifest", "packages/db/package.json", Outcome::Skipped),
            StepRecord::new("player schema", "packages/db/shared/schemas/Player.ts", Outcome::Written),
            StepRecord::failed("world schema", "packages/db/shared/schemas/World.ts", FailureKind::Write, "denied"),
        ]);

        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.applied, 1);
        assert_eq!(report.summary.untouched, 1);
        assert_eq!(report.summary.failed, 1);
        assert!(report.has_failures());
        assert_eq!(report.failures().count(), 1);
        assert_eq!(
            report.step_for("packages/db/shared/schemas/Player.ts").map(|s| &s.outcome),
            Some(&Outcome::Written)
        );
    }

    #[test]
    fn report_serialization() {
        let report = RunReport::new();
        let json = report.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("\"steps\""));
    }
}
