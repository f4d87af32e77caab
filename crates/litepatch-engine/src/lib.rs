//! litepatch engine
//!
//! This crate implements the patch run itself:
//! - Path writer (directory creation, full overwrite, atomic replace)
//! - Orchestrator (manifest patch, then every catalog artifact, in order)
//! - Per-step outcome recording into the run report

pub mod writer;
pub mod orchestrator;

pub use writer::{PathWriter, WriteError};
pub use orchestrator::{Orchestrator, MANIFEST_STEP};
