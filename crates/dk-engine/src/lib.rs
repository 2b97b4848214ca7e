//! Rule engine for Dachkammer.
//!
//! A story is a set of [`Choice`]s. Each choice is guarded by
//! [`Condition`]s and resolved into [`Effect`]s. Conditions and effects are
//! built by name through a [`Registry`], so content files can refer to
//! them by their `type` string. Beyond the choices declared in content,
//! the generators in [`choice::generic`] derive ephemeral choices from the
//! current state every tick ("pick up X", "open Y", "go north").
//!
//! [`GameSession`] ties everything together into the tick protocol:
//! describe, offer, select, apply.

/// Choices, conditions, effects, and dynamic choice generators.
pub mod choice;
/// Error types for the rule engine.
pub mod error;
/// Narrator: result templates and location descriptions.
pub mod narrator;
/// Name-to-constructor tables for conditions and effects.
pub mod registry;
/// The static rule set: declared choices and exits.
pub mod rules;
/// Tick protocol between the engine and its front end.
pub mod session;

pub use choice::{Choice, Condition, Effect, Exit, ResultText};
pub use error::{ConfigError, EngineError, EngineResult};
pub use narrator::{NarratorConfig, TemplateRegistry};
pub use registry::Registry;
pub use rules::RuleSet;
pub use session::{GameSession, OptionEntry, Presentation, SessionConfig};
