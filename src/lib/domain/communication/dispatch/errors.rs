//! Dispatch errors

use thiserror::Error;

use crate::domain::communication::{
    email_addresses::EmailAddressError, templates::RenderError,
};

/// Errors returned synchronously by a send call, before any submission is attempted
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The message has no "to" recipient
    #[error("at least one recipient is required")]
    NoRecipients,

    /// A recipient is not an email address
    #[error(transparent)]
    InvalidEmailAddress(#[from] EmailAddressError),

    /// The body could not be rendered
    #[error("could not render the email body: {0}")]
    Render(#[from] RenderError),

    /// There is no async runtime to run the background submission on
    #[error("sending requires a running tokio runtime")]
    NoRuntime,
}
