//! SQLite source templates
//!
//! This crate handles:
//! - Embedding the TypeScript bodies written into the target workspace
//! - Binding each body to its destination path, in write order
//! - Rendering the bodies that share the data-file resolution logic

pub mod catalog;
pub mod renderer;

pub use catalog::{ArtifactSpec, TemplateCatalog, TemplateEntry, CATALOG};
pub use renderer::{TemplateRenderer, TemplateError};
