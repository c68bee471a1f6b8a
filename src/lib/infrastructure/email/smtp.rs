//! SMTP mail transport implementation

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use crate::domain::communication::{
    email_addresses::EmailAddress,
    mailer::{MailTransport, MailerError, OutgoingMessage},
    settings::{MailSettings, SmtpCredentials},
};

/// How the connection to the SMTP server is secured
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TlsMode {
    /// Upgrade with STARTTLS when the server offers it
    Opportunistic,

    /// Always upgrade with STARTTLS
    Required,

    /// Plaintext only
    Disabled,
}

/// Options for building an SMTP client
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmtpClientOptions {
    /// The SMTP host
    pub host: String,

    /// The SMTP port, when not the transport's default
    pub port: Option<u16>,

    /// TLS mode
    pub tls: TlsMode,

    /// Credentials, when the server requires authentication
    pub credentials: Option<SmtpCredentials>,
}

impl From<&MailSettings> for SmtpClientOptions {
    fn from(settings: &MailSettings) -> Self {
        let tls = match settings.enable_tls() {
            Some(true) => TlsMode::Required,
            Some(false) => TlsMode::Disabled,
            None => TlsMode::Opportunistic,
        };

        Self {
            host: settings.host().to_string(),
            port: settings.port(),
            tls,
            credentials: settings.credentials().cloned(),
        }
    }
}

impl SmtpClientOptions {
    /// Build a new SMTP client
    pub fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailerError> {
        let mut builder = match self.tls {
            TlsMode::Required => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)?,
            TlsMode::Disabled => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host),
            TlsMode::Opportunistic => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host).tls(
                    Tls::Opportunistic(TlsParameters::new(self.host.clone())?),
                )
            }
        };

        if let Some(port) = self.port {
            builder = builder.port(port);
        }

        if let Some(credentials) = &self.credentials {
            builder = builder.credentials(Credentials::new(
                credentials.username().to_string(),
                credentials.password().to_string(),
            ));
        }

        Ok(builder.build())
    }
}

/// SMTP mailer
///
/// Every submission gets its own client, so no connection state is shared
/// between concurrent sends.
#[derive(Debug, Clone)]
pub struct SMTPMailer {
    options: SmtpClientOptions,
}

impl SMTPMailer {
    /// Create a new SMTP mailer
    pub fn new(settings: &MailSettings) -> Self {
        Self {
            options: SmtpClientOptions::from(settings),
        }
    }

    /// The options each SMTP client is built from
    pub fn options(&self) -> &SmtpClientOptions {
        &self.options
    }
}

#[async_trait]
impl MailTransport for SMTPMailer {
    async fn submit(&self, message: OutgoingMessage) -> Result<(), MailerError> {
        let email = build_message(&message)?;

        let response = self.options.transport()?.send(email).await?;

        debug!(host = %self.options.host, code = %response.code(), "SMTP server accepted message");

        Ok(())
    }
}

fn mailbox(email: &EmailAddress) -> Mailbox {
    email.mailbox().clone()
}

/// Converts an [`OutgoingMessage`] into a single-part HTML message
pub fn build_message(message: &OutgoingMessage) -> Result<Message, MailerError> {
    let mut builder = Message::builder()
        .from(mailbox(&message.from))
        .subject(message.subject.clone())
        .header(ContentType::TEXT_HTML);

    for to in &message.to {
        builder = builder.to(mailbox(to));
    }

    for cc in &message.cc {
        builder = builder.cc(mailbox(cc));
    }

    Ok(builder.body(message.html_body.clone())?)
}
