//! CSV over HTTP(S).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, info};

use super::{parse_payload, DataSource};
use crate::error::{IngestError, IngestResult};
use crate::records::RecordSet;

const USER_AGENT_VALUE: &str = concat!("sentiflow-ingest/", env!("CARGO_PKG_VERSION"));

/// Reads a public CSV file with a single GET request.
#[derive(Debug, Clone)]
pub struct UrlSource {
    client: reqwest::Client,
    url: String,
}

impl UrlSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> IngestResult<Self> {
        let url = url.into();

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|e| {
                IngestError::source_unavailable(&url, format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl DataSource for UrlSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> IngestResult<RecordSet> {
        info!(url = %self.url, "loading data from URL");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| IngestError::source_unavailable(&self.url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::source_unavailable(
                &self.url,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let bytes = response.bytes().await.map_err(|e| {
            IngestError::source_unavailable(&self.url, format!("failed to read response body: {}", e))
        })?;
        debug!(url = %self.url, bytes = bytes.len(), "response received");

        let records = parse_payload(&self.url, &bytes)?;
        info!(
            url = %self.url,
            records = records.len(),
            "loaded data from URL"
        );
        Ok(records)
    }
}
