//! Error handling for survey repair and generation.

use std::io;
use std::path::Path;

use thiserror::Error;

/// Specialized error type for survey processing
#[derive(Debug, Error)]
pub enum SurveyError {
    /// Malformed domain or constraint input, detected before any processing
    #[error("Structural error: {0}")]
    Structural(String),

    /// The correction loop did not reach a fixed point within its pass budget
    #[error("Correction loop did not converge after {passes} passes")]
    Convergence {
        /// Number of passes executed before giving up
        passes: usize,
    },

    /// The generation pipeline kept losing rows to correction and never reached its target
    #[error("Generation stalled after {rounds} rounds")]
    GenerationStalled {
        /// Number of generation rounds executed
        rounds: usize,
    },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed text input
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        message: String,
    },

    /// Error opening, reading or writing a file
    #[error("IO error: {context}")]
    Io {
        /// What was being attempted
        context: String,
        #[source]
        source: io::Error,
    },

    /// Error reading or writing JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SurveyError {
    /// Build a structural error
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural(message.into())
    }

    /// Build a parse error for a 1-based line number
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Wrap an IO error with the path it happened on
    pub fn io(action: &str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            context: format!("{action} {}", path.display()),
            source,
        }
    }
}

/// Result type for survey operations
pub type Result<T> = std::result::Result<T, SurveyError>;
