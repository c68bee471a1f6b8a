//! Email message

use crate::domain::communication::email_addresses::EmailAddress;

/// A composed message, ready for submission.
///
/// The body is always HTML. Messages are built once per send and handed to
/// the transport by value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// The sender of the email
    pub from: EmailAddress,

    /// The recipients of the email
    pub to: Vec<EmailAddress>,

    /// The copied recipients of the email
    pub cc: Vec<EmailAddress>,

    /// The subject of the email
    pub subject: String,

    /// The HTML body of the email
    pub html_body: String,
}
