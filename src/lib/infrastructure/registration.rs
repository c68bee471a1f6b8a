//! Service registration
//!
//! Wires an [`EmailSender`] together from [`MailSettings`]. A renderer or
//! transport supplied by the host always wins; the defaults ([`TeraRenderer`]
//! and [`SMTPMailer`]) are only installed for the pieces left unset.

use std::{fmt, sync::Arc};

use tracing::debug;

use crate::{
    domain::communication::{
        dispatch::EmailSender,
        mailer::MailTransport,
        settings::MailSettings,
        templates::{RenderError, TemplateRenderer},
    },
    infrastructure::{email::smtp::SMTPMailer, templates::tera_renderer::TeraRenderer},
};

/// Builds an [`EmailSender`]
pub struct MailingBuilder {
    settings: MailSettings,
    renderer: Option<Arc<dyn TemplateRenderer>>,
    transport: Option<Arc<dyn MailTransport>>,
}

impl MailingBuilder {
    /// Starts from `settings` with no renderer or transport registered
    pub fn new(settings: MailSettings) -> Self {
        Self {
            settings,
            renderer: None,
            transport: None,
        }
    }

    /// Use `renderer` instead of the default template renderer
    pub fn renderer(mut self, renderer: Arc<dyn TemplateRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Use `transport` instead of SMTP
    pub fn transport(mut self, transport: Arc<dyn MailTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the sender, installing defaults for anything not registered.
    ///
    /// # Returns
    /// - [`Ok`] with the [`EmailSender`].
    /// - [`Err`] containing a [`RenderError`] if the default renderer could not load its templates.
    pub fn build(self) -> Result<EmailSender, RenderError> {
        let renderer: Arc<dyn TemplateRenderer> = match self.renderer {
            Some(renderer) => renderer,
            None => {
                debug!("no template renderer registered, using Tera");

                Arc::new(TeraRenderer::from_settings(&self.settings)?)
            }
        };

        let transport: Arc<dyn MailTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(SMTPMailer::new(&self.settings)),
        };

        Ok(EmailSender::new(&self.settings, renderer, transport))
    }
}

impl fmt::Debug for MailingBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailingBuilder")
            .field("settings", &self.settings)
            .field("renderer", &self.renderer.is_some())
            .field("transport", &self.transport.is_some())
            .finish()
    }
}

/// Creates an SMTP-backed [`EmailSender`], rendering with `renderer` when
/// one is given and with Tera otherwise.
pub fn register(
    settings: MailSettings,
    renderer: Option<Arc<dyn TemplateRenderer>>,
) -> Result<EmailSender, RenderError> {
    let builder = MailingBuilder::new(settings);

    match renderer {
        Some(renderer) => builder.renderer(renderer),
        None => builder,
    }
    .build()
}
