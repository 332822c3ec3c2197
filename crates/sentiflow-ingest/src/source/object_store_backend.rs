//! Object store implementation of [`DataSource`].
//!
//! Production runs use S3 via `object_store`'s `AmazonS3Builder::from_env()`.
//! Credentials are taken, in order, from:
//!
//! - `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` (+ `AWS_SESSION_TOKEN`)
//! - web identity (`AWS_WEB_IDENTITY_TOKEN_FILE` with `AWS_ROLE_ARN`)
//! - ECS container credentials (`AWS_CONTAINER_CREDENTIALS_RELATIVE_URI`)
//! - EC2 instance metadata
//!
//! Shared config files (`~/.aws/credentials`, `AWS_PROFILE`) are not read;
//! export the profile's keys into the environment instead.
//!
//! Tests inject an in-memory store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use object_store::path::Path;
use object_store::{ClientOptions, ObjectStore, ObjectStoreExt};
use tracing::info;

use super::{parse_payload, DataSource};
use crate::error::{IngestError, IngestResult};
use crate::records::RecordSet;

/// Reads one CSV object from a bucket.
pub struct ObjectStoreSource {
    inner: Arc<dyn ObjectStore>,
    bucket: String,
    key: Path,
}

impl ObjectStoreSource {
    /// S3 reader for `bucket`/`key` in `region`.
    pub fn s3(bucket: &str, region: &str, key: &str, timeout: Duration) -> IngestResult<Self> {
        if bucket.trim().is_empty() {
            return Err(IngestError::config("S3 bucket name is not set"));
        }

        let store = object_store::aws::AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_region(region)
            .with_allow_http(false)
            .with_client_options(ClientOptions::new().with_timeout(timeout))
            .build()
            .map_err(|e| {
                IngestError::source_unavailable(
                    format!("s3://{}/{}", bucket, key),
                    format!("failed to create S3 client: {}", e),
                )
            })?;

        info!(bucket, region, "S3 client initialized from environment credentials");

        Ok(Self::with_store(Arc::new(store), bucket, key))
    }

    /// Reader over an arbitrary store (in-memory for tests).
    pub fn with_store(inner: Arc<dyn ObjectStore>, bucket: &str, key: &str) -> Self {
        Self {
            inner,
            bucket: bucket.to_string(),
            key: Path::from(key),
        }
    }
}

#[async_trait]
impl DataSource for ObjectStoreSource {
    fn describe(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }

    async fn fetch(&self) -> IngestResult<RecordSet> {
        let location = self.describe();
        info!(key = %self.key, bucket = %self.bucket, "fetching object from S3");

        let result = self.inner.get(&self.key).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => {
                IngestError::source_unavailable(&location, "object not found")
            }
            _ => IngestError::source_unavailable(&location, format!("failed to get object: {}", e)),
        })?;

        let bytes = result.bytes().await.map_err(|e| {
            IngestError::source_unavailable(&location, format!("failed to read object bytes: {}", e))
        })?;

        let records = parse_payload(&location, &bytes)?;
        info!(
            key = %self.key,
            bucket = %self.bucket,
            records = records.len(),
            "fetched and loaded object from S3"
        );
        Ok(records)
    }
}
