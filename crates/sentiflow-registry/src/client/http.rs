//! HTTP layer: auth, status mapping.
//!
//! This is the ONLY place for status code handling. client/mod.rs never
//! interprets status codes. Every request is sent exactly once.

use serde::Serialize;
use tracing::debug;

use crate::auth::Credentials;
use crate::error::{RegistryError, RegistryResult};
use crate::types::ErrorBody;

/// HTTP backend for making requests (holds reqwest client and credentials).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) credentials: Credentials,
}

impl HttpBackend {
    /// `POST {base_url}/api/2.0/mlflow/{endpoint}` with a JSON body.
    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> RegistryResult<reqwest::Response> {
        let url = format!("{}/api/2.0/mlflow/{}", self.base_url, endpoint);
        debug!(url = %url, "registry request");

        let request = self.credentials.apply(self.client.post(&url).json(body));
        let response = request.send().await?;
        let status = response.status().as_u16();

        if (200..=299).contains(&status) {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let message = body
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| non_empty_or(&text, "no error message"));

        Err(match status {
            401 | 403 => RegistryError::Unauthorized { message },
            404 => RegistryError::NotFound { message },
            _ => RegistryError::Api {
                status,
                error_code: body.error_code.unwrap_or_else(|| "UNKNOWN".to_string()),
                message,
            },
        })
    }
}

fn non_empty_or(text: &str, fallback: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
