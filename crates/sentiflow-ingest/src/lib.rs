//! Sentiment dataset ingestion.
//!
//! Loads a labelled CSV from a public URL or an S3 bucket, keeps the
//! `positive` / `negative` rows, encodes them as `1` / `0`, makes a seeded
//! stratified train/test split and writes `<data_path>/raw/{train,test}.csv`.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! # async fn example() -> sentiflow_ingest::IngestResult<()> {
//! let report = sentiflow_ingest::run_from_params(Path::new("params.yaml"), None).await?;
//! println!("{} train / {} test rows", report.train, report.test);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `DATA_SOURCE` | `URL` or `S3` (default: `URL`) |
//! | `AWS_BUCKET_NAME` | Bucket name, required for `S3` |
//! | `AWS_REGION` | Bucket region (default: `ap-south-1`) |
//!
//! `params.yaml` must contain `data_ingestion.test_size`; see [`config`] for
//! the optional keys.

pub mod config;
pub mod error;
pub mod persist;
pub mod pipeline;
pub mod preprocess;
pub mod records;
pub mod source;
pub mod split;

pub use config::{DataIngestionParams, IngestConfig, Params, SourceDescriptor};
pub use error::{ErrorKind, IngestError, IngestResult};
pub use persist::{persist_split, PersistedPaths};
pub use pipeline::{run_from_params, IngestPipeline, PipelineReport, Stage};
pub use preprocess::{preprocess, LABEL_COLUMN};
pub use records::RecordSet;
pub use source::{read_source, reader_for, DataSource, ObjectStoreSource, UrlSource};
pub use split::{stratified_split, SplitResult};
