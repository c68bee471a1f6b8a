//! Template rendering module

mod errors;

use serde_json::Value;

#[cfg(test)]
use mockall::mock;

pub use errors::RenderError;

/// Turns a named template and a model into an HTML body
pub trait TemplateRenderer: Send + Sync + 'static {
    /// Render a template
    ///
    /// # Arguments
    /// * `template` - The identifier of the template to render.
    /// * `model` - The data made available to the template.
    ///
    /// # Returns
    /// - [`Ok`] with the rendered HTML.
    /// - [`Err`] containing a [`RenderError`] if the template is unknown or fails to render.
    fn render(&self, template: &str, model: &Value) -> Result<String, RenderError>;
}

#[cfg(test)]
mock! {
    pub TemplateRenderer {}

    impl TemplateRenderer for TemplateRenderer {
        fn render(&self, template: &str, model: &Value) -> Result<String, RenderError>;
    }
}
