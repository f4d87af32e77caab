//! Template rendering
//!
//! Bodies are rendered with an empty context. The only dynamic piece is the
//! `locate_database(depth)` function, which expands to the shared data-file
//! resolution statements.

use litepatch_core::DataFileLocator;
use minijinja::{context, AutoEscape, Environment, UndefinedBehavior};

use crate::catalog::CATALOG;

/// Error during template rendering
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Failed to render template {template}: {message}")]
    Render {
        template: String,
        message: String,
    },

    #[error("Unknown artifact: {0}")]
    UnknownArtifact(String),
}

/// MiniJinja environment holding every catalog template
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Create a renderer using the given locator for generated path logic
    pub fn new(locator: DataFileLocator) -> Self {
        let mut env = Environment::new();

        // Output is TypeScript: no escaping, keep the final newline, fail on typos
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        env.add_function("locate_database", move |depth: usize| -> String {
            locator.render_typescript(depth)
        });

        for entry in CATALOG {
            if let Err(e) = env.add_template(entry.template, entry.source) {
                // Surfaces again on render; keep the environment usable for the rest
                tracing::error!(template = entry.template, error = %e, "failed to register template");
            }
        }

        Self { env }
    }

    /// Render one registered template
    pub fn render(&self, template: &str) -> Result<String, TemplateError> {
        let render_error = |e: minijinja::Error| TemplateError::Render {
            template: template.to_string(),
            message: e.to_string(),
        };

        let rendered = self
            .env
            .get_template(template)
            .map_err(render_error)?
            .render(context! {})
            .map_err(render_error)?;

        tracing::debug!(template, bytes = rendered.len(), "rendered template");
        Ok(rendered)
    }

    /// Check if a body contains template syntax
    pub fn has_template_syntax(source: &str) -> bool {
        source.contains("{{") || source.contains("{%") || source.contains("{#")
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new(DataFileLocator::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_has_template_syntax() {
        assert!(TemplateRenderer::has_template_syntax("{{ locate_database(0) }}"));
        assert!(TemplateRenderer::has_template_syntax("{% if x %}{% endif %}"));
        assert!(!TemplateRenderer::has_template_syntax("JSON.stringify({})"));
    }

    #[test]
    fn test_static_template_passthrough() {
        let renderer = TemplateRenderer::default();
        let entry = CATALOG.iter().find(|e| e.template == "player_schema.ts.jinja").unwrap();

        assert_eq!(renderer.render(entry.template).unwrap(), entry.source);
    }

    #[test]
    fn test_locator_is_indented_into_bootstrap() {
        let rendered = TemplateRenderer::default().render("database.ts.jinja").unwrap();

        assert!(rendered.contains(
            "    const packageRoot = path.basename(path.resolve(__dirname, \".\")) === \"dist\"\n      ? path.resolve(__dirname, \"..\")\n"
        ));
        assert!(rendered.contains("\n    const dbPath = path.resolve(packageRoot, \"data/database.db\");\n"));
        assert!(!TemplateRenderer::has_template_syntax(&rendered));
    }

    #[test]
    fn test_custom_marker_flows_into_output() {
        let renderer = TemplateRenderer::new(DataFileLocator::new("build", "var/app.db"));
        let rendered = renderer.render("seeds.ts.jinja").unwrap();

        assert!(rendered.contains("=== \"build\""));
        assert!(rendered.contains("path.resolve(packageRoot, \"var/app.db\")"));
    }

    #[test]
    fn test_unknown_template() {
        let err = TemplateRenderer::default().render("missing.ts.jinja").unwrap_err();
        assert!(matches!(err, TemplateError::Render { .. }));
    }
}
