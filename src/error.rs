//! Error types for stylesheet processing.
//!
//! Scoping never fails; these cover the text boundary around it (parsing
//! source text and reading host configuration). Non-fatal scoping problems
//! are reported as [`crate::validate::Warning`] values instead.

use thiserror::Error;

/// Errors raised while parsing stylesheet text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CssError {
    /// A `{` was never closed.
    #[error("unclosed block at {line}:{column}")]
    UnclosedBlock { line: u32, column: u32 },

    /// A `/*` was never closed.
    #[error("unclosed comment at {line}:{column}")]
    UnclosedComment { line: u32, column: u32 },

    /// A quoted string ran to the end of the input.
    #[error("unclosed string at {line}:{column}")]
    UnclosedString { line: u32, column: u32 },

    /// A `}` with no matching `{`.
    #[error("unexpected '}}' at {line}:{column}")]
    UnexpectedCloseBrace { line: u32, column: u32 },

    /// Any other tokenizer failure.
    #[error("unexpected token at {line}:{column}")]
    UnexpectedToken { line: u32, column: u32 },
}

/// Errors raised while reading scoping configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Json(String),

    #[error("unknown placeholder '[{0}]' in scoped name pattern")]
    UnknownPlaceholder(String),

    #[error("invalid hash length '{0}' in scoped name pattern")]
    InvalidHashLength(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err.to_string())
    }
}
