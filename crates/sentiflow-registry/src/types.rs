//! Registry configuration and MLflow wire types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, RegistryResult};

/// Output of the evaluation step: which run produced the model and where its
/// artifact lives inside that run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub run_id: String,

    /// Artifact path relative to the run root (e.g. `model`).
    pub model_path: String,
}

impl ModelInfo {
    /// Registry source URI, `runs:/<run_id>/<model_path>`.
    pub fn source_uri(&self) -> String {
        format!(
            "runs:/{}/{}",
            self.run_id,
            self.model_path.trim_start_matches('/')
        )
    }
}

/// Lifecycle stage of a model version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStage {
    None,
    Staging,
    Production,
    Archived,
}

impl ModelStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Staging => "Staging",
            Self::Production => "Production",
            Self::Archived => "Archived",
        }
    }
}

impl fmt::Display for ModelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered model version as returned by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelVersion {
    pub name: String,
    pub version: String,

    #[serde(default)]
    pub current_stage: Option<String>,

    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub run_id: Option<String>,

    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `POST /api/2.0/mlflow/model-versions/create`.
#[derive(Debug, Serialize)]
pub(crate) struct CreateModelVersionRequest<'a> {
    pub name: &'a str,
    pub source: &'a str,
    pub run_id: &'a str,
}

/// Body of `POST /api/2.0/mlflow/model-versions/transition-stage`.
#[derive(Debug, Serialize)]
pub(crate) struct TransitionStageRequest<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub stage: &'a str,
    pub archive_existing_versions: bool,
}

/// Response of both model-version endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ModelVersionResponse {
    pub model_version: ModelVersion,
}

/// MLflow error payload.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error_code: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

/// Registry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Tracking server base URI (e.g. `https://dagshub.com/<owner>/<repo>.mlflow`).
    pub tracking_uri: String,

    /// Basic-auth user.
    #[serde(default)]
    pub username: Option<String>,

    /// Basic-auth password.
    #[serde(default)]
    pub password: Option<String>,

    /// Bearer token, used when no username/password is configured.
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

fn parse_timeout(raw: &str) -> RegistryResult<u64> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(RegistryError::Config {
            message: format!(
                "MLFLOW_HTTP_REQUEST_TIMEOUT must be a positive number of seconds, got '{}'",
                raw
            ),
        }),
    }
}

impl RegistryConfig {
    pub fn new(tracking_uri: impl Into<String>) -> Self {
        Self {
            tracking_uri: tracking_uri.into(),
            username: None,
            password: None,
            token: None,
            timeout_secs: default_timeout(),
        }
    }

    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `MLFLOW_TRACKING_URI` | Tracking server base URI (required) |
    /// | `MLFLOW_TRACKING_USERNAME` | Basic-auth user |
    /// | `MLFLOW_TRACKING_PASSWORD` | Basic-auth password |
    /// | `MLFLOW_TRACKING_TOKEN` | Bearer token |
    /// | `MLFLOW_HTTP_REQUEST_TIMEOUT` | Request timeout in seconds (default: 30) |
    ///
    /// Fails when `MLFLOW_TRACKING_URI` is unset or empty, or when the timeout
    /// is not a positive whole number of seconds.
    pub fn from_env() -> RegistryResult<Self> {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let tracking_uri = non_empty("MLFLOW_TRACKING_URI").ok_or_else(|| RegistryError::Config {
            message: "MLFLOW_TRACKING_URI is not set".to_string(),
        })?;

        let timeout_secs = match non_empty("MLFLOW_HTTP_REQUEST_TIMEOUT") {
            Some(raw) => parse_timeout(&raw)?,
            None => default_timeout(),
        };

        Ok(Self {
            tracking_uri,
            username: non_empty("MLFLOW_TRACKING_USERNAME"),
            password: non_empty("MLFLOW_TRACKING_PASSWORD"),
            token: non_empty("MLFLOW_TRACKING_TOKEN"),
            timeout_secs,
        })
    }

    /// Set basic-auth credentials.
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
