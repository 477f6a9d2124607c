//! Error types for the résumé pipeline.
//!
//! Only [`TenureError`] and [`DocumentError`] are meant to reach a caller as
//! failures. Company lookups and skill-category lookups report "not found"
//! as ordinary values, and strategy failures are absorbed by the aggregator.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load or validate a résumé document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read resume file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("resume document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("resume document must be a JSON object at the top level")]
    NotAnObject,

    #[error("resume document is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("experience entry #{index} has an empty `{field}`")]
    InvalidEntry { index: usize, field: &'static str },
}

/// Failure to derive total tenure from duration strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TenureError {
    #[error("cannot parse duration {duration:?}: {reason}")]
    ParseFailure {
        duration: String,
        reason: &'static str,
    },

    #[error("Unable to calculate experience")]
    NoExperience,
}

/// Raised by the formatter in strict mode when the retrieved data does not
/// have the shape the selected template reads from.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("{template} template found none of the expected fields ({expected}) in the retrieved data")]
    ShapeMismatch {
        template: &'static str,
        expected: &'static str,
    },
}

/// A single retrieval strategy failed. The aggregator logs and skips these.
#[derive(Debug, Error)]
#[error("strategy `{strategy}` failed: {message}")]
pub struct StrategyError {
    pub strategy: String,
    pub message: String,
}

impl StrategyError {
    pub fn new(strategy: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            message: message.into(),
        }
    }
}

/// Failure to load a question set or write evaluation results.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid question set: {0}")]
    Json(#[from] serde_json::Error),
}
