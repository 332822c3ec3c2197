//! Error types for model registration.

use std::path::PathBuf;

/// Registry errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The model-info file could not be read or parsed.
    #[error("model info error ({}): {message}", path.display())]
    ModelInfo { path: PathBuf, message: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Authentication failed or credentials were rejected.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Registered model, run or version does not exist.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// The registry rejected the request.
    #[error("registry API error (HTTP {status}, {error_code}): {message}")]
    Api {
        status: u16,
        error_code: String,
        message: String,
    },

    /// Network error.
    #[error("network error: {message}")]
    Network { message: String },

    /// Invalid response from registry.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },
}

impl RegistryError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ModelInfo { .. } => 2,
            Self::Config { .. } => 2,
            Self::Unauthorized { .. } => 3,
            Self::NotFound { .. } => 4,
            Self::Api { .. } => 4,
            Self::Network { .. } => 5,
            Self::InvalidResponse { .. } => 6,
        }
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
