//! Error types for the ingestion pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Coarse classification of an [`IngestError`], for callers that branch on
/// the failure category rather than the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    SourceUnavailable,
    Schema,
    Io,
}

/// Errors that can occur while ingesting a dataset.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A required setting is missing or has an invalid value.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The dataset could not be fetched or parsed from its source.
    #[error("source unavailable ({source_name}): {message}")]
    SourceUnavailable {
        source_name: String,
        message: String,
    },

    /// An expected column is missing or malformed.
    #[error("schema error: {message}")]
    Schema { message: String },

    /// Writing to the local filesystem failed.
    #[error("I/O failure at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn source_unavailable(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::SourceUnavailable { .. } => ErrorKind::SourceUnavailable,
            Self::Schema { .. } => ErrorKind::Schema,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Suggested exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Configuration => 2,
            ErrorKind::SourceUnavailable => 3,
            ErrorKind::Schema => 4,
            ErrorKind::Io => 5,
        }
    }
}
