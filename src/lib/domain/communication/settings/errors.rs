//! Configuration errors

use thiserror::Error;

/// Errors raised while validating the mail configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is absent or blank
    #[error("missing required mail setting `{0}`")]
    MissingSetting(&'static str),

    /// The sender account is not an email address
    #[error("mail account is not a valid email address")]
    InvalidAccount,

    /// Only one of user and password was supplied
    #[error("mail user and password must be configured together")]
    IncompleteCredentials,
}
