//! Infrastructure: SMTP submission, template engine, configuration loading and registration

pub mod email;
pub mod registration;
pub mod templates;
