//! Mailer errors

use lettre::{error::Error, transport::smtp};
use thiserror::Error;

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// The server refused the message
    #[error("the mail server rejected the message: {0}")]
    Rejected(String),

    /// The background submission did not run to completion
    #[error("the background send was aborted")]
    Aborted,

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<Error> for MailerError {
    fn from(err: Error) -> Self {
        MailerError::UnknownError(err.into())
    }
}

impl From<smtp::Error> for MailerError {
    fn from(err: smtp::Error) -> Self {
        if err.is_permanent() {
            return MailerError::Rejected(err.to_string());
        }

        MailerError::UnknownError(err.into())
    }
}
