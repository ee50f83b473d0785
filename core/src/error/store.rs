use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures of the durable store. Every variant carries enough context for the
/// dispatch layer to tell the user which file is affected.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("corrupt task store at {}: {reason}", path.display())]
    CorruptStore { path: PathBuf, reason: String },

    #[error("unsupported schema version {found:?} (this build reads {expected:?})")]
    UnsupportedSchema { found: String, expected: String },

    #[error(
        "could not lock {} after {attempts} attempts ({}ms)",
        path.display(),
        waited.as_millis()
    )]
    LockUnavailable {
        path: PathBuf,
        attempts: u32,
        waited: Duration,
    },

    #[error("storage error on {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The new contents replaced the data file, but flushing the directory
    /// entry failed. The write landed; only its durability across a crash is
    /// in doubt, so repeating the save is not needed.
    #[error("saved {} but could not flush its directory: {source}", path.display())]
    Unsynced {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Storage {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        StoreError::CorruptStore {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Contention errors are worth retrying later; everything else is not.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::LockUnavailable { .. })
    }
}
