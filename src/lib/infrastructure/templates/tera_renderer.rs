//! Tera template renderer
//!
//! The default [`TemplateRenderer`]. Loads every `*.html` file below the
//! configured templates directory; a template is addressed by its path
//! relative to that directory, with or without the `.html` suffix.

use std::{fmt, path::Path};

use anyhow::Context as _;
use css_inline::CSSInliner;
use serde_json::Value;
use tera::{Context, Tera};
use tracing::debug;

use crate::domain::communication::{
    settings::MailSettings,
    templates::{RenderError, TemplateRenderer},
};

/// Renders templates with Tera and inlines their CSS
pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    /// Loads the templates below `templates_location`. Without a location
    /// no template is known and every render fails.
    pub fn new(templates_location: Option<&Path>) -> Result<Self, RenderError> {
        let tera = match templates_location {
            Some(dir) => {
                let glob = format!("{}/**/*.html", dir.display());

                Tera::new(&glob)
                    .with_context(|| format!("failed to load templates from {}", dir.display()))?
            }
            None => Tera::default(),
        };

        debug!(
            templates = tera.get_template_names().count(),
            "loaded email templates"
        );

        Ok(Self::from_tera(tera))
    }

    /// Loads the templates from the configured templates location
    pub fn from_settings(settings: &MailSettings) -> Result<Self, RenderError> {
        Self::new(settings.templates_location())
    }

    /// Wraps an already configured Tera instance
    pub fn from_tera(tera: Tera) -> Self {
        Self { tera }
    }

    fn resolve(&self, template: &str) -> Option<String> {
        [template.to_string(), format!("{template}.html")]
            .into_iter()
            .find(|candidate| self.tera.get_template_names().any(|name| name == candidate))
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(&self, template: &str, model: &Value) -> Result<String, RenderError> {
        let name = self
            .resolve(template)
            .ok_or_else(|| RenderError::TemplateNotFound(template.to_string()))?;

        let context = match model {
            Value::Null => Context::new(),
            Value::Object(_) => Context::from_value(model.clone())
                .map_err(|err| RenderError::InvalidModel(err.to_string()))?,
            other => {
                return Err(RenderError::InvalidModel(format!(
                    "expected an object, got {other}"
                )))
            }
        };

        let html = self
            .tera
            .render(&name, &context)
            .with_context(|| format!("failed to render template {name}"))?;

        let inlined = CSSInliner::options()
            .load_remote_stylesheets(false)
            .build()
            .inline(&html)
            .context("failed to inline email CSS")?;

        Ok(inlined)
    }
}

impl fmt::Debug for TeraRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeraRenderer")
            .field(
                "templates",
                &self.tera.get_template_names().collect::<Vec<_>>(),
            )
            .finish()
    }
}
