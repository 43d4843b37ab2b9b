//! Error taxonomy for catalog operations.

use crate::tier::Tier;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Coarse classification callers use to decide how to report a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Io,
    Index,
    State,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("parsing level {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed level {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("level index {index} out of range for tier {tier} ({len} levels)")]
    Index { tier: Tier, index: usize, len: usize },

    #[error("{0}")]
    State(String),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Parse { .. } | CatalogError::Malformed { .. } => ErrorKind::Parse,
            CatalogError::Io { .. } => ErrorKind::Io,
            CatalogError::Index { .. } => ErrorKind::Index,
            CatalogError::State(_) => ErrorKind::State,
        }
    }

    pub(crate) fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        CatalogError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        CatalogError::Malformed {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;
