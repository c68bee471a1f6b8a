//! Email communication module

pub mod dispatch;
pub mod email_addresses;
pub mod mailer;
pub mod settings;
pub mod templates;
