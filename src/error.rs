//! Error taxonomy for a census run. Every variant is fatal; a source that
//! simply matches nothing is not an error and never shows up here.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CensusError {
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse JSON in '{}': {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected a top-level JSON array in '{}', found {found}", .path.display())]
    UnexpectedShape { path: PathBuf, found: &'static str },

    #[error("invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to render report: {0}")]
    Render(String),
}

impl From<csv::Error> for CensusError {
    fn from(err: csv::Error) -> Self {
        Self::Render(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CensusError>;
