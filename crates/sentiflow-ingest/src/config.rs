//! Run configuration: `params.yaml` plus the data-source environment.
//!
//! All environment reads happen in [`SourceDescriptor::from_env`]; the
//! resulting [`IngestConfig`] is immutable and passed explicitly to every stage.
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `DATA_SOURCE` | `URL` or `S3`, case-insensitive (default and fallback: `URL`) |
//! | `AWS_BUCKET_NAME` | Bucket holding the dataset (required when `DATA_SOURCE=S3`) |
//! | `AWS_REGION` | Bucket region (default: `ap-south-1`) |

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{IngestError, IngestResult};

pub const DEFAULT_PARAMS_PATH: &str = "params.yaml";
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/vikashishere/Datasets/refs/heads/main/data.csv";
pub const DEFAULT_OBJECT_KEY: &str = "data.csv";
pub const DEFAULT_REGION: &str = "ap-south-1";

pub const ENV_DATA_SOURCE: &str = "DATA_SOURCE";
pub const ENV_BUCKET_NAME: &str = "AWS_BUCKET_NAME";
pub const ENV_REGION: &str = "AWS_REGION";

/// Top-level layout of `params.yaml`. Sections belonging to other pipeline
/// stages are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    pub data_ingestion: DataIngestionParams,
}

/// The `data_ingestion` section of `params.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DataIngestionParams {
    /// Fraction of rows that go to the test split, in (0, 1).
    pub test_size: f64,

    /// Seed for the stratified split.
    #[serde(default = "default_random_state")]
    pub random_state: u64,

    /// CSV address used when `DATA_SOURCE=URL`.
    #[serde(default = "default_source_url")]
    pub source_url: String,

    /// Object key used when `DATA_SOURCE=S3`.
    #[serde(default = "default_object_key")]
    pub object_key: String,

    /// Output root; files land under `<data_path>/raw/`.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Fetch timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_random_state() -> u64 {
    42
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

fn default_object_key() -> String {
    DEFAULT_OBJECT_KEY.to_string()
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_timeout_secs() -> u64 {
    30
}

impl Params {
    /// Load and validate parameters from a YAML file.
    pub fn load(path: &Path) -> IngestResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            IngestError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let params = Self::from_yaml_str(&content).map_err(|e| match e {
            IngestError::Configuration { message } => {
                IngestError::config(format!("{}: {}", path.display(), message))
            }
            other => other,
        })?;
        debug!(path = %path.display(), "parameters loaded");
        Ok(params)
    }

    pub fn from_yaml_str(content: &str) -> IngestResult<Self> {
        let params: Self = serde_yaml::from_str(content)
            .map_err(|e| IngestError::config(format!("invalid params: {}", e)))?;
        params.data_ingestion.validate()?;
        Ok(params)
    }
}

impl DataIngestionParams {
    fn validate(&self) -> IngestResult<()> {
        validate_test_size(self.test_size)?;
        if self.timeout_secs == 0 {
            return Err(IngestError::config(
                "data_ingestion.timeout_secs must be greater than zero",
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_test_size(test_size: f64) -> IngestResult<()> {
    if test_size > 0.0 && test_size < 1.0 {
        Ok(())
    } else {
        Err(IngestError::config(format!(
            "test_size must be in the open interval (0, 1), got {}",
            test_size
        )))
    }
}

/// Where the raw dataset comes from. Resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDescriptor {
    /// Public CSV over HTTP(S).
    Url(String),

    /// Object in an S3 bucket, read with ambient AWS credentials.
    ObjectStorage {
        bucket: String,
        region: String,
        key: String,
    },
}

impl SourceDescriptor {
    /// Resolve from the process environment.
    pub fn from_env(params: &DataIngestionParams) -> IngestResult<Self> {
        Self::from_lookup(params, |name| std::env::var(name).ok())
    }

    /// Resolve using an arbitrary variable lookup.
    pub fn from_lookup<F>(params: &DataIngestionParams, lookup: F) -> IngestResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mode = non_empty(ENV_DATA_SOURCE).unwrap_or_else(|| "URL".to_string());

        if mode.eq_ignore_ascii_case("S3") {
            let bucket = non_empty(ENV_BUCKET_NAME).ok_or_else(|| {
                IngestError::config(format!("{} is not set", ENV_BUCKET_NAME))
            })?;
            let region = non_empty(ENV_REGION).unwrap_or_else(|| DEFAULT_REGION.to_string());
            Ok(Self::ObjectStorage {
                bucket,
                region,
                key: params.object_key.clone(),
            })
        } else {
            if !mode.eq_ignore_ascii_case("URL") {
                warn!(value = %mode, "unrecognised {}, using URL", ENV_DATA_SOURCE);
            }
            url::Url::parse(&params.source_url).map_err(|e| {
                IngestError::config(format!(
                    "invalid data_ingestion.source_url '{}': {}",
                    params.source_url, e
                ))
            })?;
            Ok(Self::Url(params.source_url.clone()))
        }
    }
}

impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(address) => write!(f, "{}", address),
            Self::ObjectStorage { bucket, key, .. } => write!(f, "s3://{}/{}", bucket, key),
        }
    }
}

/// Everything a pipeline run needs, fixed before the first fetch.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub source: SourceDescriptor,
    pub test_size: f64,
    pub random_state: u64,
    pub data_path: PathBuf,
    pub timeout: Duration,
}

impl IngestConfig {
    pub fn resolve(params: &Params, source: SourceDescriptor) -> Self {
        let p = &params.data_ingestion;
        Self {
            source,
            test_size: p.test_size,
            random_state: p.random_state,
            data_path: p.data_path.clone(),
            timeout: Duration::from_secs(p.timeout_secs),
        }
    }

    /// Override the output root (CLI `--data-path`).
    pub fn with_data_path(mut self, data_path: impl Into<PathBuf>) -> Self {
        self.data_path = data_path.into();
        self
    }
}
