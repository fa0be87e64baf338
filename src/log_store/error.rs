//! Error type for log file operations.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A filesystem failure while managing the request log.
#[derive(Debug, Error)]
pub enum LogStoreError {
    #[error("failed to create log directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to rename {} to {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LogStoreError {
    pub(crate) fn read(path: &Path, source: std::io::Error) -> Self {
        Self::Read { path: path.to_path_buf(), source }
    }

    pub(crate) fn write(path: &Path, source: std::io::Error) -> Self {
        Self::Write { path: path.to_path_buf(), source }
    }

    pub(crate) fn remove(path: &Path, source: std::io::Error) -> Self {
        Self::Remove { path: path.to_path_buf(), source }
    }

    pub(crate) fn rename(from: &Path, to: &Path, source: std::io::Error) -> Self {
        Self::Rename {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        }
    }
}
