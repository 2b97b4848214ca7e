//! Error types for content loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::diagnostics::Diagnostic;

/// Result type for content loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that stop a world from loading.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum LoadError {
    /// A content file could not be read.
    #[error("cannot read {}", .path.display())]
    #[diagnostic(code(dk::load::io))]
    Io {
        /// The file or directory.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A content file is not valid JSON for its section.
    #[error("malformed content in {}: {source}", .path.display())]
    #[diagnostic(code(dk::load::parse))]
    Parse {
        /// The file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The content parsed but does not hang together.
    #[error("{}", invalid_summary(.issues))]
    #[diagnostic(
        code(dk::load::invalid),
        help("every problem is listed below; fix them all and load again")
    )]
    Invalid {
        /// Every problem found, errors and warnings.
        #[related]
        issues: Vec<Diagnostic>,
    },
}

impl LoadError {
    /// Problems found by the linker, empty for I/O and parse errors.
    pub fn issues(&self) -> &[Diagnostic] {
        match self {
            LoadError::Invalid { issues } => issues,
            _ => &[],
        }
    }
}

fn invalid_summary(issues: &[Diagnostic]) -> String {
    let errors = issues.iter().filter(|d| d.is_error()).count();
    let warnings = issues.len() - errors;
    match warnings {
        0 => format!("world is invalid: {errors} error(s)"),
        _ => format!("world is invalid: {errors} error(s), {warnings} warning(s)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_counts_errors_and_warnings() {
        let err = LoadError::Invalid {
            issues: vec![
                Diagnostic::error("manifest.start", "no start location"),
                Diagnostic::error("items.lamp", "bad"),
                Diagnostic::warning("locations.attic", "odd"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "world is invalid: 2 error(s), 1 warning(s)"
        );
        assert_eq!(err.issues().len(), 3);
    }
}
