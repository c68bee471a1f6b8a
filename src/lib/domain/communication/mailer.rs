//! Mail transport module

mod errors;
mod message;

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

pub use errors::MailerError;
pub use message::OutgoingMessage;

/// Submits composed messages to a mail server
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    /// Submit a message
    ///
    /// # Arguments
    /// * `message` - The [`OutgoingMessage`] to submit.
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] once the server accepted the message.
    async fn submit(&self, message: OutgoingMessage) -> Result<(), MailerError>;
}

#[cfg(test)]
mock! {
    pub MailTransport {}

    #[async_trait]
    impl MailTransport for MailTransport {
        async fn submit(&self, message: OutgoingMessage) -> Result<(), MailerError>;
    }
}
