//! Mail configuration loading

use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

use crate::domain::communication::settings::{ConfigError, MailSettings};

/// Mail configuration, as supplied by the host
#[derive(Clone, Default, Debug, Parser, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmtpConfig {
    /// The SMTP host
    #[arg(long = "mail-host", env = "MAIL_HOST")]
    pub host: Option<String>,

    /// The sender email address
    #[arg(long = "mail-account", env = "MAIL_ACCOUNT")]
    pub account: Option<String>,

    /// The SMTP username
    #[arg(long = "mail-user", env = "MAIL_USER")]
    pub user: Option<String>,

    /// The SMTP password
    #[arg(long = "mail-password", env = "MAIL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// The SMTP port
    #[arg(long = "mail-port", env = "MAIL_PORT")]
    pub port: Option<u16>,

    /// Require (true) or disable (false) TLS
    #[serde(rename = "enableTLS")]
    #[arg(long = "mail-enable-tls", env = "MAIL_ENABLE_TLS")]
    pub enable_tls: Option<bool>,

    /// Directory holding the email templates
    #[arg(long = "mail-templates-location", env = "MAIL_TEMPLATES_LOCATION")]
    pub templates_location: Option<PathBuf>,
}

impl TryFrom<SmtpConfig> for MailSettings {
    type Error = ConfigError;

    fn try_from(config: SmtpConfig) -> Result<Self, Self::Error> {
        let mut settings = MailSettings::new(
            config.host.as_deref().unwrap_or_default(),
            config.account.as_deref().unwrap_or_default(),
        )?;

        settings = match (non_blank(config.user), non_blank(config.password)) {
            (Some(user), Some(password)) => settings.with_credentials(&user, &password)?,
            (None, None) => settings,
            _ => return Err(ConfigError::IncompleteCredentials),
        };

        if let Some(port) = config.port {
            settings = settings.with_port(port);
        }

        if let Some(enable_tls) = config.enable_tls {
            settings = settings.with_tls(enable_tls);
        }

        if let Some(location) = config.templates_location {
            settings = settings.with_templates_location(location);
        }

        Ok(settings)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
