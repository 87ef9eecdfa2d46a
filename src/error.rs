use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("unable to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to parse '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid team catalog: {}", .0.join("; "))]
    InvalidRegistry(Vec<String>),

    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),

    #[error("unknown team '{0}'")]
    UnknownTeam(String),

    #[error("unknown venue '{0}'")]
    UnknownVenue(String),

    /// The score sampler rejected its parameter; the pass cannot continue.
    #[error("score sampling failed for lambda={lambda}: {message}")]
    Sampling { lambda: f64, message: String },

    #[error("worker pool: {0}")]
    WorkerPool(String),

    #[error("export failed: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl From<csv::Error> for SimError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}
