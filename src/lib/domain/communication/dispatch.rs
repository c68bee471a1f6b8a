//! Email dispatch service
//!
//! Builds one HTML message per call and hands it to a [`MailTransport`] on a
//! background task. Templated bodies are rendered synchronously first, so a
//! render failure is returned to the caller and nothing is submitted.

mod errors;
mod pending;
mod request;

use std::{fmt, sync::Arc};

use serde::Serialize;
use tokio::runtime::Handle;
use tracing::{debug, error, info};

pub use errors::DispatchError;
pub use pending::PendingSend;
pub use request::{Content, SendRequest};

use crate::domain::communication::{
    email_addresses::{parse_all, EmailAddress},
    mailer::{MailTransport, OutgoingMessage},
    settings::MailSettings,
    templates::TemplateRenderer,
};

/// Email dispatch service
#[derive(Clone)]
pub struct EmailSender {
    account: EmailAddress,
    renderer: Arc<dyn TemplateRenderer>,
    transport: Arc<dyn MailTransport>,
}

impl EmailSender {
    /// Creates a sender that sends from the account configured in `settings`.
    pub fn new(
        settings: &MailSettings,
        renderer: Arc<dyn TemplateRenderer>,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            account: settings.account().clone(),
            renderer,
            transport,
        }
    }

    /// Sends a message.
    ///
    /// Must be called from within a tokio runtime; the submission runs as a
    /// task on it.
    ///
    /// # Returns
    /// - [`Ok`] with a [`PendingSend`] once the message is accepted for background submission.
    /// - [`Err`] containing a [`DispatchError`] if there are no recipients or the body could not be rendered.
    pub fn send(&self, request: SendRequest) -> Result<PendingSend, DispatchError> {
        let SendRequest {
            to,
            cc,
            subject,
            content,
        } = request;

        if to.is_empty() {
            return Err(DispatchError::NoRecipients);
        }

        let runtime = Handle::try_current().map_err(|_| DispatchError::NoRuntime)?;

        let html_body = match content {
            Content::Body(body) => body,
            Content::Template { name, model } => {
                debug!(template = %name, "rendering email body");

                self.renderer.render(&name, &model)?
            }
        };

        let message = OutgoingMessage {
            from: self.account.clone(),
            to,
            cc,
            subject,
            html_body,
        };

        debug!(
            to = message.to.len(),
            cc = message.cc.len(),
            subject = %message.subject,
            "accepted email for sending"
        );

        let transport = Arc::clone(&self.transport);

        let handle = runtime.spawn(async move {
            let subject = message.subject.clone();

            match transport.submit(message).await {
                Ok(()) => {
                    info!(%subject, "email sent");
                    Ok(())
                }
                Err(err) => {
                    error!(%subject, error = %err, "could not send email");
                    Err(err)
                }
            }
        });

        Ok(PendingSend::new(handle))
    }

    /// Sends `body` to a single recipient
    pub fn send_to(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<PendingSend, DispatchError> {
        self.send(SendRequest::new(
            vec![EmailAddress::new(to)?],
            subject,
            Content::body(body),
        ))
    }

    /// Renders `template` with `model` and sends it to a single recipient
    pub fn send_template_to<M>(
        &self,
        to: &str,
        subject: &str,
        template: &str,
        model: &M,
    ) -> Result<PendingSend, DispatchError>
    where
        M: Serialize + ?Sized,
    {
        self.send(SendRequest::new(
            vec![EmailAddress::new(to)?],
            subject,
            Content::template(template, model)?,
        ))
    }

    /// Sends `body` to every recipient
    pub fn send_to_all<S: AsRef<str>>(
        &self,
        to: &[S],
        subject: &str,
        body: &str,
    ) -> Result<PendingSend, DispatchError> {
        self.send(SendRequest::new(parse_all(to)?, subject, Content::body(body)))
    }

    /// Renders `template` with `model` and sends it to every recipient
    pub fn send_template_to_all<S, M>(
        &self,
        to: &[S],
        subject: &str,
        template: &str,
        model: &M,
    ) -> Result<PendingSend, DispatchError>
    where
        S: AsRef<str>,
        M: Serialize + ?Sized,
    {
        self.send(SendRequest::new(
            parse_all(to)?,
            subject,
            Content::template(template, model)?,
        ))
    }

    /// Sends `body` to every recipient, copying `cc`
    pub fn send_with_cc<S: AsRef<str>>(
        &self,
        to: &[S],
        cc: &[S],
        subject: &str,
        body: &str,
    ) -> Result<PendingSend, DispatchError> {
        self.send(
            SendRequest::new(parse_all(to)?, subject, Content::body(body)).with_cc(parse_all(cc)?),
        )
    }

    /// Renders `template` with `model` and sends it to every recipient, copying `cc`
    pub fn send_template_with_cc<S, M>(
        &self,
        to: &[S],
        cc: &[S],
        subject: &str,
        template: &str,
        model: &M,
    ) -> Result<PendingSend, DispatchError>
    where
        S: AsRef<str>,
        M: Serialize + ?Sized,
    {
        self.send(
            SendRequest::new(parse_all(to)?, subject, Content::template(template, model)?)
                .with_cc(parse_all(cc)?),
        )
    }
}

impl fmt::Debug for EmailSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailSender")
            .field("account", &self.account)
            .field("renderer", &"TemplateRenderer")
            .field("transport", &"MailTransport")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;
    use testresult::TestResult;

    use crate::domain::communication::{
        email_addresses::EmailAddressError,
        mailer::{tests::MockMailTransport, MailerError},
        templates::{tests::MockTemplateRenderer, RenderError},
    };

    use super::*;

    fn sender(renderer: MockTemplateRenderer, transport: MockMailTransport) -> TestResult<EmailSender> {
        let settings = MailSettings::new("smtp.example.com", "noreply@example.com")?;

        Ok(EmailSender::new(&settings, Arc::new(renderer), Arc::new(transport)))
    }

    fn addresses(raw: &[&str]) -> Vec<EmailAddress> {
        raw.iter()
            .map(|email| EmailAddress::new(email).expect("valid address"))
            .collect()
    }

    #[tokio::test]
    async fn test_send_with_cc_builds_one_html_message() -> TestResult {
        let expected = OutgoingMessage {
            from: EmailAddress::new("noreply@example.com")?,
            to: addresses(&["a@x.com", "b@x.com"]),
            cc: addresses(&["c@x.com"]),
            subject: "Hi".to_string(),
            html_body: "Body".to_string(),
        };

        let mut renderer = MockTemplateRenderer::new();
        let mut transport = MockMailTransport::new();

        renderer.expect_render().times(0);

        transport
            .expect_submit()
            .times(1)
            .withf(move |message| *message == expected)
            .returning(|_| Ok(()));

        let sender = sender(renderer, transport)?;

        sender
            .send_with_cc(&["a@x.com", "b@x.com"], &["c@x.com"], "Hi", "Body")?
            .outcome()
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_send_to_single_recipient() -> TestResult {
        let mut transport = MockMailTransport::new();

        transport
            .expect_submit()
            .times(1)
            .withf(|message| {
                message.to == addresses(&["a@x.com"])
                    && message.cc.is_empty()
                    && message.subject == "Hello"
                    && message.html_body == "<p>Hello</p>"
            })
            .returning(|_| Ok(()));

        let sender = sender(MockTemplateRenderer::new(), transport)?;

        sender
            .send_to("a@x.com", "Hello", "<p>Hello</p>")?
            .outcome()
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_send_to_all_addresses_every_recipient() -> TestResult {
        let mut renderer = MockTemplateRenderer::new();
        let mut transport = MockMailTransport::new();

        renderer.expect_render().times(0);

        transport
            .expect_submit()
            .times(1)
            .withf(|message| {
                message.to == addresses(&["a@x.com", "b@x.com", "Ada Lovelace <ada@x.com>"])
                    && message.cc.is_empty()
                    && message.html_body == "<p>News</p>"
            })
            .returning(|_| Ok(()));

        let sender = sender(renderer, transport)?;

        sender
            .send_to_all(
                &["a@x.com", "b@x.com", "Ada Lovelace <ada@x.com>"],
                "News",
                "<p>News</p>",
            )?
            .outcome()
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_send_template_to_uses_rendered_body() -> TestResult {
        let mut renderer = MockTemplateRenderer::new();
        let mut transport = MockMailTransport::new();

        renderer
            .expect_render()
            .times(1)
            .withf(|template, model| template == "reset" && model["code"] == 42)
            .returning(|_, _| Ok("<p>Your code is 42</p>".to_string()));

        transport
            .expect_submit()
            .times(1)
            .withf(|message| {
                message.to == addresses(&["a@x.com"])
                    && message.cc.is_empty()
                    && message.subject == "Reset"
                    && message.html_body == "<p>Your code is 42</p>"
            })
            .returning(|_| Ok(()));

        let sender = sender(renderer, transport)?;

        sender
            .send_template_to("a@x.com", "Reset", "reset", &json!({ "code": 42 }))?
            .outcome()
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_pending_send_finishes_in_the_background() -> TestResult {
        let mut transport = MockMailTransport::new();

        transport.expect_submit().times(1).returning(|_| Ok(()));

        let sender = sender(MockTemplateRenderer::new(), transport)?;

        let pending = sender.send_to("a@x.com", "Hi", "Body")?;

        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while !pending.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await?;

        assert!(pending.is_finished());
        pending.outcome().await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_send_template_renders_once_before_submitting() -> TestResult {
        let mut renderer = MockTemplateRenderer::new();
        let mut transport = MockMailTransport::new();

        renderer
            .expect_render()
            .times(1)
            .withf(|template, model| template == "welcome" && model["name"] == "Ada")
            .returning(|_, _| Ok("<p>Hello Ada</p>".to_string()));

        transport
            .expect_submit()
            .times(1)
            .withf(|message| message.html_body == "<p>Hello Ada</p>")
            .returning(|_| Ok(()));

        let sender = sender(renderer, transport)?;

        sender
            .send_template_to_all(&["a@x.com"], "Welcome", "welcome", &json!({ "name": "Ada" }))?
            .outcome()
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_render_failure_prevents_sending() -> TestResult {
        let mut renderer = MockTemplateRenderer::new();
        let mut transport = MockMailTransport::new();

        renderer
            .expect_render()
            .times(1)
            .returning(|template, _| Err(RenderError::TemplateNotFound(template.to_string())));

        transport.expect_submit().times(0);

        let sender = sender(renderer, transport)?;

        let result = sender.send_template_to("a@x.com", "Welcome", "missing", &json!({}));

        assert!(matches!(
            result,
            Err(DispatchError::Render(RenderError::TemplateNotFound(name))) if name == "missing"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_literal_and_templated_bodies_produce_the_same_message() -> TestResult {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&sent);

        let mut renderer = MockTemplateRenderer::new();
        let mut transport = MockMailTransport::new();

        renderer
            .expect_render()
            .times(1)
            .returning(|_, _| Ok("Body".to_string()));

        transport.expect_submit().times(2).returning(move |message| {
            captured.lock().expect("lock").push(message);
            Ok(())
        });

        let sender = sender(renderer, transport)?;

        sender
            .send_with_cc(&["a@x.com", "b@x.com"], &["c@x.com"], "Hi", "Body")?
            .outcome()
            .await?;

        sender
            .send_template_with_cc(&["a@x.com", "b@x.com"], &["c@x.com"], "Hi", "body", &())?
            .outcome()
            .await?;

        let sent = sent.lock().expect("lock");

        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], sent[1]);

        Ok(())
    }

    #[tokio::test]
    async fn test_every_call_sends_its_own_message() -> TestResult {
        let mut transport = MockMailTransport::new();

        transport.expect_submit().times(2).returning(|_| Ok(()));

        let sender = sender(MockTemplateRenderer::new(), transport)?;

        let first = sender.send_to("a@x.com", "Hi", "Body")?;
        let second = sender.send_to("a@x.com", "Hi", "Body")?;

        first.outcome().await?;
        second.outcome().await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_recipients_are_rejected() -> TestResult {
        let mut renderer = MockTemplateRenderer::new();
        let mut transport = MockMailTransport::new();

        renderer.expect_render().times(0);
        transport.expect_submit().times(0);

        let sender = sender(renderer, transport)?;
        let nobody: [&str; 0] = [];

        let result = sender.send_template_to_all(&nobody, "Hi", "welcome", &json!({}));

        assert!(matches!(result, Err(DispatchError::NoRecipients)));

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_rejected() -> TestResult {
        let mut transport = MockMailTransport::new();

        transport.expect_submit().times(0);

        let sender = sender(MockTemplateRenderer::new(), transport)?;

        let result = sender.send_to("nope", "Hi", "Body");

        assert!(matches!(
            result,
            Err(DispatchError::InvalidEmailAddress(
                EmailAddressError::InvalidEmailAddress(_)
            ))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_transport_failure_is_only_visible_through_outcome() -> TestResult {
        let mut transport = MockMailTransport::new();

        transport
            .expect_submit()
            .times(1)
            .returning(|_| Err(MailerError::Rejected("550 mailbox unavailable".to_string())));

        let sender = sender(MockTemplateRenderer::new(), transport)?;

        let pending = sender.send_to("a@x.com", "Hi", "Body")?;

        assert!(matches!(
            pending.outcome().await,
            Err(MailerError::Rejected(_))
        ));

        Ok(())
    }

    #[test]
    fn test_send_outside_a_runtime_fails() -> TestResult {
        let mut renderer = MockTemplateRenderer::new();
        let mut transport = MockMailTransport::new();

        renderer.expect_render().times(0);
        transport.expect_submit().times(0);

        let sender = sender(renderer, transport)?;

        let result = sender.send_template_to("a@x.com", "Hi", "welcome", &json!({}));

        assert!(matches!(result, Err(DispatchError::NoRuntime)));

        Ok(())
    }
}
