#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Sends one email from the command line

use anyhow::{bail, Context, Result};
use clap::Parser;
use mailing_ferret::{
    domain::communication::{
        dispatch::{Content, SendRequest},
        email_addresses::parse_all,
        settings::MailSettings,
    },
    infrastructure::{email::config::SmtpConfig, registration::register},
};
use serde_json::Value;
use tracing::info;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The mail configuration
    #[command(flatten)]
    pub smtp: SmtpConfig,

    /// Recipient address, may be repeated
    #[arg(long, required = true)]
    pub to: Vec<String>,

    /// Copied recipient address, may be repeated
    #[arg(long)]
    pub cc: Vec<String>,

    /// The subject of the email
    #[arg(long)]
    pub subject: String,

    /// A literal HTML body
    #[arg(long, conflicts_with = "template")]
    pub body: Option<String>,

    /// The template to render the body from
    #[arg(long)]
    pub template: Option<String>,

    /// The template model, as a JSON object
    #[arg(long, requires = "template")]
    pub model: Option<String>,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let settings = MailSettings::try_from(args.smtp)?;
    let sender = register(settings, None)?;

    let content = match (args.body, args.template) {
        (Some(body), _) => Content::body(body),
        (None, Some(name)) => {
            let model = match args.model {
                Some(raw) => serde_json::from_str(&raw).context("--model is not valid JSON")?,
                None => Value::Null,
            };

            Content::Template { name, model }
        }
        (None, None) => bail!("either --body or --template is required"),
    };

    let request =
        SendRequest::new(parse_all(&args.to)?, args.subject, content).with_cc(parse_all(&args.cc)?);

    sender.send(request)?.outcome().await?;

    info!("email sent");

    Ok(())
}
