//! Mail settings
//!
//! The validated, immutable view of the host's mail configuration. It is
//! built once and shared by the dispatch service, the SMTP transport and the
//! default template renderer.

mod errors;

use std::{
    fmt,
    path::{Path, PathBuf},
};

pub use errors::ConfigError;

use super::email_addresses::EmailAddress;

/// SMTP credentials. Always complete: a username never travels without its password.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    username: String,
    password: String,
}

impl SmtpCredentials {
    /// The SMTP username
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The SMTP password
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Mail settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailSettings {
    host: String,
    account: EmailAddress,
    credentials: Option<SmtpCredentials>,
    port: Option<u16>,
    enable_tls: Option<bool>,
    templates_location: Option<PathBuf>,
}

impl MailSettings {
    /// Creates settings for `host`, sending from `account`.
    pub fn new(host: &str, account: &str) -> Result<Self, ConfigError> {
        let host = required("host", host)?;
        let account = required("account", account)?;

        let account = EmailAddress::new(account).map_err(|_| ConfigError::InvalidAccount)?;

        Ok(Self {
            host: host.to_string(),
            account,
            credentials: None,
            port: None,
            enable_tls: None,
            templates_location: None,
        })
    }

    /// Authenticate as `username`. Both values must be non-blank.
    pub fn with_credentials(mut self, username: &str, password: &str) -> Result<Self, ConfigError> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(ConfigError::IncompleteCredentials);
        }

        self.credentials = Some(SmtpCredentials {
            username: username.trim().to_string(),
            password: password.to_string(),
        });

        Ok(self)
    }

    /// Submit on `port` instead of the transport's default
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Require (`true`) or disable (`false`) TLS
    pub fn with_tls(mut self, enable_tls: bool) -> Self {
        self.enable_tls = Some(enable_tls);
        self
    }

    /// Directory the default template renderer loads templates from
    pub fn with_templates_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.templates_location = Some(path.into());
        self
    }

    /// The SMTP host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The "from" address of every message
    pub fn account(&self) -> &EmailAddress {
        &self.account
    }

    /// The SMTP credentials, if any
    pub fn credentials(&self) -> Option<&SmtpCredentials> {
        self.credentials.as_ref()
    }

    /// The configured port, if any
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// The configured TLS flag, if any
    pub fn enable_tls(&self) -> Option<bool> {
        self.enable_tls
    }

    /// The configured templates directory, if any
    pub fn templates_location(&self) -> Option<&Path> {
        self.templates_location.as_deref()
    }
}

fn required<'a>(name: &'static str, value: &'a str) -> Result<&'a str, ConfigError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ConfigError::MissingSetting(name));
    }

    Ok(trimmed)
}
