//! Raw dataset sources.
//!
//! Two backends, selected by [`SourceDescriptor`]:
//!
//! - [`UrlSource`]: plain HTTP(S) GET of a public CSV
//! - [`ObjectStoreSource`]: S3 object read through `object_store`, with
//!   credentials from the environment or instance metadata
//!
//! Both decode the payload as UTF-8 CSV into a [`RecordSet`]. A single attempt
//! is made; any transport, status or parse failure is reported as
//! [`IngestError::SourceUnavailable`].

pub mod http;
pub mod object_store_backend;

use std::time::Duration;

use async_trait::async_trait;

use crate::config::SourceDescriptor;
use crate::error::{IngestError, IngestResult};
use crate::records::RecordSet;

pub use http::UrlSource;
pub use object_store_backend::ObjectStoreSource;

/// Anything that can produce the raw record set for a run.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Human-readable location, used in logs and errors.
    fn describe(&self) -> String;

    /// Fetch and parse the dataset.
    async fn fetch(&self) -> IngestResult<RecordSet>;
}

/// Build the reader for a resolved descriptor.
///
/// No network traffic happens here; clients are only configured.
pub fn reader_for(
    descriptor: &SourceDescriptor,
    timeout: Duration,
) -> IngestResult<Box<dyn DataSource>> {
    match descriptor {
        SourceDescriptor::Url(address) => Ok(Box::new(UrlSource::new(address, timeout)?)),
        SourceDescriptor::ObjectStorage {
            bucket,
            region,
            key,
        } => Ok(Box::new(ObjectStoreSource::s3(bucket, region, key, timeout)?)),
    }
}

/// Fetch the dataset described by `descriptor`.
pub async fn read_source(
    descriptor: &SourceDescriptor,
    timeout: Duration,
) -> IngestResult<RecordSet> {
    reader_for(descriptor, timeout)?.fetch().await
}

/// Decode a fetched payload. Shared by both backends.
pub(crate) fn parse_payload(source_name: &str, bytes: &[u8]) -> IngestResult<RecordSet> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        IngestError::source_unavailable(source_name, format!("payload is not valid UTF-8: {}", e))
    })?;
    RecordSet::from_csv_str(text).map_err(|e| {
        IngestError::source_unavailable(source_name, format!("unparsable CSV: {}", e))
    })
}
