extern crate thiserror;

use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Query(#[from] QueryError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("I/O Error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Serialization Error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Attaches the offending path to an I/O failure.
    pub fn io<P: Into<PathBuf>>(path: P) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    /// Caller-input failures, as opposed to failures of the index itself.
    #[inline]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Query(_))
    }
}

/// Index construction errors.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("Corpus is empty: {0:?}")]
    EmptyCorpus(PathBuf),

    #[error("Corpus directory not found: {0:?}")]
    MissingCorpus(PathBuf),

    #[error("Document {0} is not present in the document map")]
    UnknownDocument(u32),

    #[error("Spill file {path:?} is out of order at record {record}")]
    UnsortedSpill { path: PathBuf, record: usize },
}

/// Durable index errors.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("No committed index under {0:?}")]
    MissingIndex(PathBuf),

    #[error("Length mismatch for term {term:?}: expected {expected}, found {found}")]
    LengthMismatch {
        term: String,
        expected: u32,
        found: u32,
    },

    #[error("Checksum mismatch for term {0:?}")]
    ChecksumMismatch(String),
}

/// Boolean query validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("Unbalanced quotation marks")]
    UnbalancedQuotes,

    #[error("Invalid operator: {0:?}")]
    InvalidOperator(String),

    #[error("Operator {0:?} before the first sub-query")]
    LeadingOperator(String),

    #[error("Unexpected text after the last sub-query: {0:?}")]
    TrailingText(String),

    #[error("Query has no sub-queries")]
    Empty,
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use std::io;

    use crate::error::{Error, QueryError, StoreError};

    #[test]
    fn test_error_display() {
        let err = Error::from(QueryError::InvalidOperator("not".into()));
        assert_eq!(err.to_string(), "Invalid operator: \"not\"");
        assert!(err.is_validation());
    }

    #[test]
    fn test_error_io_is_not_validation() {
        let err = Error::io("index.dat")(io::Error::from(io::ErrorKind::NotFound));
        assert!(!err.is_validation());

        let err = Error::from(StoreError::ChecksumMismatch("cat".into()));
        assert!(!err.is_validation());
    }
}
