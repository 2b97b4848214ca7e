//! Error types for the rule engine.

use dk_core::DomainError;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors found while building rules from content. Always fatal at load time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No condition is registered under this name.
    #[error("unknown condition type \"{0}\"")]
    UnknownCondition(String),

    /// No effect is registered under this name.
    #[error("unknown effect type \"{0}\"")]
    UnknownEffect(String),

    /// A required parameter is absent.
    #[error("{rule} is missing parameter \"{param}\"")]
    MissingParam {
        /// Condition or effect type name.
        rule: String,
        /// The missing parameter.
        param: &'static str,
    },

    /// A parameter has the wrong JSON type.
    #[error("{rule} parameter \"{param}\" must be a {expected}")]
    InvalidParam {
        /// Condition or effect type name.
        rule: String,
        /// The offending parameter.
        param: String,
        /// Expected JSON type.
        expected: &'static str,
    },

    /// No result template is registered under this key.
    #[error("unknown result template \"{0}\"")]
    UnknownTemplate(String),
}

/// Errors that can occur while running a session.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The choice's conditions do not hold.
    #[error("preconditions not met for choice \"{choice}\"")]
    PreconditionsNotMet {
        /// The rejected choice.
        choice: String,
    },

    /// A condition could not be evaluated.
    #[error("choice \"{choice}\": condition {condition} failed: {source}")]
    Condition {
        /// The choice being evaluated.
        choice: String,
        /// Condition type name.
        condition: &'static str,
        /// Underlying domain error.
        #[source]
        source: DomainError,
    },

    /// An effect failed; the state was left untouched.
    #[error("choice \"{choice}\": effect {effect} failed: {source}")]
    Effect {
        /// The choice being applied.
        choice: String,
        /// Effect type name.
        effect: &'static str,
        /// Underlying domain error.
        #[source]
        source: DomainError,
    },

    /// The selection key matches no offered option.
    #[error("no option \"{key}\"{}", suggestion_hint(.suggestion))]
    InvalidSelection {
        /// What the player typed.
        key: String,
        /// Closest offered choice id, if any is close enough.
        suggestion: Option<String>,
    },

    /// Domain error outside choice application (e.g. a bad start location).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Rule configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean \"{s}\"?)"))
        .unwrap_or_default()
}

impl EngineError {
    /// Returns true for errors the front end should report and then carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidSelection { .. } | EngineError::PreconditionsNotMet { .. }
        )
    }

    /// The underlying domain error, if any.
    pub fn domain_error(&self) -> Option<&DomainError> {
        match self {
            EngineError::Condition { source, .. } | EngineError::Effect { source, .. } => {
                Some(source)
            }
            EngineError::Domain(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_error_mentions_suggestion() {
        let err = EngineError::InvalidSelection {
            key: "opne_box".to_string(),
            suggestion: Some("open_box".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "no option \"opne_box\" (did you mean \"open_box\"?)"
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn selection_error_without_suggestion() {
        let err = EngineError::InvalidSelection {
            key: "9".to_string(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "no option \"9\"");
    }
}
