//! Render errors

use thiserror::Error;

/// Errors that can occur while rendering a template
#[derive(Debug, Error)]
pub enum RenderError {
    /// No template is registered under this name
    #[error("template `{0}` not found")]
    TemplateNotFound(String),

    /// The model cannot be handed to the template
    #[error("invalid template model: {0}")]
    InvalidModel(String),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::InvalidModel(err.to_string())
    }
}
