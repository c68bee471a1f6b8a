#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Templated HTML email over SMTP
//!
//! Build an [`EmailSender`](domain::communication::dispatch::EmailSender)
//! with [`register`](infrastructure::registration::register), then send
//! literal or templated bodies to one or more recipients.

pub mod domain;
pub mod infrastructure;
