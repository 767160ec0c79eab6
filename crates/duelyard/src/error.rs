//! Unified error type for the Duelyard facade.

use std::path::PathBuf;

use duelyard_arena::{ArenaError, JoinRejection, SetupError};

/// Top-level error that wraps the errors of the sub-crates plus the
/// facade's own I/O and runtime failures.
///
/// `#[from]` gives `?` conversions from the wrapped types.
#[derive(Debug, thiserror::Error)]
pub enum DuelyardError {
    /// An arena operation failed (setup, join, not enabled).
    #[error(transparent)]
    Arena(#[from] ArenaError),

    /// A config file is not valid JSON for the expected shape.
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    /// A config file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The arena runtime has stopped.
    #[error("arena `{0}` is not running")]
    Unavailable(String),
}

impl From<SetupError> for DuelyardError {
    fn from(e: SetupError) -> Self {
        Self::Arena(e.into())
    }
}

impl From<JoinRejection> for DuelyardError {
    fn from(e: JoinRejection) -> Self {
        Self::Arena(e.into())
    }
}

impl DuelyardError {
    /// The join rejection inside this error, if it is one.
    pub fn join_rejection(&self) -> Option<JoinRejection> {
        match self {
            Self::Arena(ArenaError::Join(rejection)) => Some(*rejection),
            _ => None,
        }
    }
}
