//! package.json dependency swap
//!
//! This crate handles:
//! - Reading the database package's manifest (absence is not an error)
//! - Dropping the PostgreSQL driver from `dependencies`
//! - Adding the SQLite driver and its type declarations
//! - Writing the result back with stable key order and two-space indentation

pub mod manifest;

pub use manifest::{ManifestPatch, PatchOutcome, ManifestError};
