//! Narrator system for generating descriptive text.

mod config;
mod templates;

pub use config::NarratorConfig;
pub use templates::{DEFAULT_TEMPLATES, TemplateRegistry};
