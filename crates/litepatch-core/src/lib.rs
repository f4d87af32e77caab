//! litepatch core
//!
//! Shared domain model for the patcher: configuration, step outcomes,
//! the run report and the data-file locator baked into generated code.
//! Failure kind strings are part of the report format - never rename them.

pub mod outcome;
pub mod report;
pub mod config;
pub mod layout;

pub use outcome::{FailureKind, Outcome, StepRecord};
pub use report::{RunReport, ReportSummary, ReportVersion};
pub use config::{Config, ConfigError, ManifestSettings, CONFIG_FILE_NAME};
pub use layout::{DataFileLocator, BUILD_OUTPUT_MARKER, DATA_FILE};
