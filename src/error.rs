extern crate thiserror;

use std::{io, path::PathBuf};

use thiserror::Error;

/// Binary error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Index(#[from] meklet::Error),

    #[error("{0}")]
    Lock(#[from] LockError),

    #[error("An index already exists under {0:?}, pass --force to rebuild it")]
    IndexExists(PathBuf),

    #[error("Worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Serialization Error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Build lock errors.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("Another build holds {0:?}")]
    Held(PathBuf),

    #[error("Lock file I/O Error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
