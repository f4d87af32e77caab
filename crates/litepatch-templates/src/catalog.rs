//! Template catalog
//!
//! Fixed, ordered table of artifacts. Order is write order.

use crate::renderer::{TemplateError, TemplateRenderer};

/// A catalog row: logical name, destination and embedded body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateEntry {
    /// Logical artifact name
    pub name: &'static str,

    /// Destination relative to the workspace root
    pub destination: &'static str,

    /// Template name inside the renderer
    pub template: &'static str,

    /// Embedded template body
    pub source: &'static str,
}

pub const CATALOG: &[TemplateEntry] = &[
    TemplateEntry {
        name: "player schema",
        destination: "packages/db/shared/schemas/Player.ts",
        template: "player_schema.ts.jinja",
        source: include_str!("../templates/player_schema.ts.jinja"),
    },
    TemplateEntry {
        name: "world schema",
        destination: "packages/db/shared/schemas/World.ts",
        template: "world_schema.ts.jinja",
        source: include_str!("../templates/world_schema.ts.jinja"),
    },
    TemplateEntry {
        name: "database bootstrap",
        destination: "packages/db/Database.ts",
        template: "database.ts.jinja",
        source: include_str!("../templates/database.ts.jinja"),
    },
    TemplateEntry {
        name: "player handler",
        destination: "packages/db/handlers/Player.ts",
        template: "player_handler.ts.jinja",
        source: include_str!("../templates/player_handler.ts.jinja"),
    },
    TemplateEntry {
        name: "world handler",
        destination: "packages/db/handlers/World.ts",
        template: "world_handler.ts.jinja",
        source: include_str!("../templates/world_handler.ts.jinja"),
    },
    TemplateEntry {
        name: "seed script",
        destination: "packages/db/scripts/seeds.ts",
        template: "seeds.ts.jinja",
        source: include_str!("../templates/seeds.ts.jinja"),
    },
    TemplateEntry {
        name: "build config (package root)",
        destination: "packages/db/drizzle.config.ts",
        template: "drizzle_package.ts.jinja",
        source: include_str!("../templates/drizzle_package.ts.jinja"),
    },
    TemplateEntry {
        name: "build config (server app)",
        destination: "apps/server/drizzle.config.ts",
        template: "drizzle_server.ts.jinja",
        source: include_str!("../templates/drizzle_server.ts.jinja"),
    },
];

/// A rendered artifact ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    /// Logical artifact name
    pub name: String,

    /// Destination relative to the workspace root
    pub destination: String,

    /// Complete file body
    pub content: String,
}

/// Renders catalog entries into artifacts
#[derive(Default)]
pub struct TemplateCatalog {
    renderer: TemplateRenderer,
}

impl TemplateCatalog {
    pub fn new(renderer: TemplateRenderer) -> Self {
        Self { renderer }
    }

    /// Catalog rows in write order
    pub fn entries(&self) -> &'static [TemplateEntry] {
        CATALOG
    }

    /// (name, destination) pairs without rendering anything
    pub fn names(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        CATALOG.iter().map(|e| (e.name, e.destination))
    }

    /// Render a single artifact by logical name or destination
    pub fn get(&self, name: &str) -> Result<ArtifactSpec, TemplateError> {
        let entry = CATALOG
            .iter()
            .find(|e| e.name == name || e.destination == name)
            .ok_or_else(|| TemplateError::UnknownArtifact(name.to_string()))?;

        self.render_entry(entry)
    }

    /// Render every artifact, in write order
    pub fn render_all(&self) -> Result<Vec<ArtifactSpec>, TemplateError> {
        CATALOG.iter().map(|entry| self.render_entry(entry)).collect()
    }

    fn render_entry(&self, entry: &TemplateEntry) -> Result<ArtifactSpec, TemplateError> {
        Ok(ArtifactSpec {
            name: entry.name.to_string(),
            destination: entry.destination.to_string(),
            content: self.renderer.render(entry.template)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn destinations_are_unique() {
        let destinations: HashSet<_> = CATALOG.iter().map(|e| e.destination).collect();
        assert_eq!(destinations.len(), CATALOG.len());
    }

    #[test]
    fn render_all_keeps_write_order() {
        let artifacts = TemplateCatalog::default().render_all().unwrap();
        let destinations: Vec<_> = artifacts.iter().map(|a| a.destination.as_str()).collect();

        assert_eq!(
            destinations,
            vec![
                "packages/db/shared/schemas/Player.ts",
                "packages/db/shared/schemas/World.ts",
                "packages/db/Database.ts",
                "packages/db/handlers/Player.ts",
                "packages/db/handlers/World.ts",
                "packages/db/scripts/seeds.ts",
                "packages/db/drizzle.config.ts",
                "apps/server/drizzle.config.ts",
            ]
        );
    }

    #[test]
    fn rendered_artifacts_are_complete_files() {
        for artifact in TemplateCatalog::default().render_all().unwrap() {
            assert!(!artifact.content.is_empty(), "{} is empty", artifact.name);
            assert!(artifact.content.ends_with('\n'), "{} lost its final newline", artifact.name);
            assert!(
                !TemplateRenderer::has_template_syntax(&artifact.content),
                "{} still contains template syntax",
                artifact.name
            );
        }
    }

    #[test]
    fn only_data_file_consumers_are_templated() {
        let templated: Vec<_> = CATALOG
            .iter()
            .filter(|e| TemplateRenderer::has_template_syntax(e.source))
            .map(|e| e.name)
            .collect();

        assert_eq!(templated, vec!["database bootstrap", "seed script"]);
    }

    #[test]
    fn bootstrap_and_seed_script_share_resolution() {
        let catalog = TemplateCatalog::default();
        let bootstrap = catalog.get("database bootstrap").unwrap().content;
        let seeds = catalog.get("packages/db/scripts/seeds.ts").unwrap().content;

        for content in [&bootstrap, &seeds] {
            assert!(content.contains("=== \"dist\""));
            assert!(content.contains("const dbPath = path.resolve(packageRoot, \"data/database.db\");"));
            assert!(!content.contains("__dirname.includes"));
        }
    }

    #[test]
    fn schemas_target_sqlite() {
        let catalog = TemplateCatalog::default();
        let player = catalog.get("player schema").unwrap().content;

        assert!(player.contains("sqliteTable(\"players\""));
        assert!(player.contains("default(sql`(current_timestamp)`)"));
    }

    #[test]
    fn unknown_artifact() {
        let err = TemplateCatalog::default().get("user schema").unwrap_err();
        assert!(matches!(err, TemplateError::UnknownArtifact(name) if name == "user schema"));
    }

    #[test]
    fn names_lists_catalog() {
        let names: Vec<_> = TemplateCatalog::default().names().map(|(n, _)| n).collect();
        assert_eq!(names.len(), 8);
        assert_eq!(names[0], "player schema");
        assert_eq!(names[7], "build config (server app)");
    }
}
