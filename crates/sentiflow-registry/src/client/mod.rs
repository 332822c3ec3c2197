//! MLflow model-registry client.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::auth::Credentials;
use crate::error::{RegistryError, RegistryResult};
use crate::register::ModelRegistry;
use crate::types::{
    CreateModelVersionRequest, ModelStage, ModelVersion, ModelVersionResponse, RegistryConfig,
    TransitionStageRequest,
};

mod http;

use http::HttpBackend;

const USER_AGENT_VALUE: &str = concat!("sentiflow-registry/", env!("CARGO_PKG_VERSION"));

/// Client for the MLflow REST API.
#[derive(Debug, Clone)]
pub struct MlflowClient {
    http: HttpBackend,
}

impl MlflowClient {
    pub fn new(config: RegistryConfig) -> RegistryResult<Self> {
        let parsed = url::Url::parse(&config.tracking_uri).map_err(|e| RegistryError::Config {
            message: format!("invalid tracking URI '{}': {}", config.tracking_uri, e),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RegistryError::Config {
                message: format!(
                    "tracking URI must be http(s), got '{}'",
                    config.tracking_uri
                ),
            });
        }
        if config.timeout_secs == 0 {
            return Err(RegistryError::Config {
                message: "request timeout must be at least one second".to_string(),
            });
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| RegistryError::Network {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http: HttpBackend {
                client,
                base_url: config.tracking_uri.trim_end_matches('/').to_string(),
                credentials: Credentials::from_config(&config),
            },
        })
    }

    /// Build from `MLFLOW_*` environment variables.
    pub fn from_env() -> RegistryResult<Self> {
        Self::new(RegistryConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.http.base_url
    }

    async fn model_version_call<B: serde::Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> RegistryResult<ModelVersion> {
        let response = self.http.post_json(endpoint, body).await?;
        let parsed: ModelVersionResponse =
            response
                .json()
                .await
                .map_err(|e| RegistryError::InvalidResponse {
                    message: format!("failed to parse {} response: {}", endpoint, e),
                })?;
        Ok(parsed.model_version)
    }
}

#[async_trait]
impl ModelRegistry for MlflowClient {
    async fn create_model_version(
        &self,
        name: &str,
        source: &str,
        run_id: &str,
    ) -> RegistryResult<ModelVersion> {
        debug!(name = %name, source = %source, "creating model version");
        let body = CreateModelVersionRequest {
            name,
            source,
            run_id,
        };
        self.model_version_call("model-versions/create", &body)
            .await
    }

    async fn transition_stage(
        &self,
        name: &str,
        version: &str,
        stage: ModelStage,
    ) -> RegistryResult<ModelVersion> {
        debug!(name = %name, version = %version, stage = %stage, "transitioning model version");
        let body = TransitionStageRequest {
            name,
            version,
            stage: stage.as_str(),
            archive_existing_versions: false,
        };
        self.model_version_call("model-versions/transition-stage", &body)
            .await
    }
}
