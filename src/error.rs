//! Error taxonomy for initialization and per-message processing.
//!
//! Initialization errors (corpus loading, invalid patterns, bad grammars) are
//! fatal: a pipeline is never built from a partially loaded corpus.
//! [`Error::StageFailure`] is the only error a built pipeline returns, and it
//! is scoped to a single message.

use std::path::PathBuf;

use thiserror::Error;

use crate::linguistic::EngineError;
use crate::stages::Stage;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A keyword corpus entry with an empty pattern.
    #[error("invalid keyword pattern {pattern:?}: pattern must not be empty")]
    InvalidPattern { pattern: String },

    /// A normalization stage could not produce its output.
    #[error("stage {stage} failed: {cause}")]
    StageFailure {
        stage: Stage,
        #[source]
        cause: StageError,
    },

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed csv in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed json in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A CSV row with fewer columns than the format requires.
    #[error("{}:{line}: expected {expected} columns", path.display())]
    MissingColumn { path: PathBuf, line: u64, expected: usize },

    /// A configured regular-expression grammar that does not compile.
    #[error("invalid grammar for stage {stage}: {source}")]
    Grammar {
        stage: Stage,
        #[source]
        source: Box<fancy_regex::Error>,
    },
}

impl Error {
    pub(crate) fn stage(stage: Stage, cause: impl Into<StageError>) -> Self {
        Error::StageFailure { stage, cause: cause.into() }
    }
}

/// The cause carried by [`Error::StageFailure`].
#[derive(Debug, Error)]
pub enum StageError {
    /// The linguistic-analysis capability reported an internal error.
    #[error("linguistic engine: {0}")]
    Engine(#[from] EngineError),

    /// A look-around grammar gave up (backtracking limit).
    #[error(transparent)]
    Regex(#[from] fancy_regex::Error),
}
