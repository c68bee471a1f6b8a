//! Template engines

pub mod tera_renderer;
