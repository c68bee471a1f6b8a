//! Email Address

use std::{fmt, str::FromStr};

use lettre::{message::Mailbox, Address};
use thiserror::Error;

use EmailAddressError::*;

/// An error that can occur when creating an email address
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmailAddressError {
    /// The email address is empty
    #[error("email is empty")]
    EmptyEmailAddress,

    /// The email address is invalid
    #[error("email is invalid: {0}")]
    InvalidEmailAddress(String),
}

/// An email address, optionally with a display name (`Ada Lovelace <ada@x.com>`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailAddress(Mailbox);

impl EmailAddress {
    /// Create a new email address
    pub fn new(raw: &str) -> Result<Self, EmailAddressError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(EmptyEmailAddress);
        }

        trimmed
            .parse::<Mailbox>()
            .map(Self)
            .map_err(|_| InvalidEmailAddress(trimmed.to_string()))
    }

    /// The mailbox as understood by the SMTP library
    pub fn mailbox(&self) -> &Mailbox {
        &self.0
    }

    /// The bare address, without display name
    pub fn address(&self) -> &Address {
        &self.0.email
    }
}

impl FromStr for EmailAddress {
    type Err = EmailAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0.to_string()
    }
}

/// Parses every raw address, failing on the first one that is not an address.
pub fn parse_all<S: AsRef<str>>(raw: &[S]) -> Result<Vec<EmailAddress>, EmailAddressError> {
    raw.iter().map(|email| EmailAddress::new(email.as_ref())).collect()
}
