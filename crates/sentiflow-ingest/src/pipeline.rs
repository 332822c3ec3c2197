//! The ingestion driver: config → source → preprocess → split → persist.
//!
//! Progress is a strictly linear sequence of [`Stage`]s. Any failure is
//! logged once with the stage it happened in and returned unchanged; nothing
//! is retried or rolled back.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::config::{IngestConfig, Params, SourceDescriptor};
use crate::error::IngestResult;
use crate::persist::{persist_split, PersistedPaths};
use crate::preprocess::{preprocess, LABEL_COLUMN};
use crate::source::{reader_for, DataSource};
use crate::split::stratified_split;

/// Pipeline progress. `Failed` is reachable from every other stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    ConfigLoaded,
    SourceSelected,
    DataFetched,
    DataPreprocessed,
    DataSplit,
    DataPersisted,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::ConfigLoaded => "config_loaded",
            Self::SourceSelected => "source_selected",
            Self::DataFetched => "data_fetched",
            Self::DataPreprocessed => "data_preprocessed",
            Self::DataSplit => "data_split",
            Self::DataPersisted => "data_persisted",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks the current stage and attaches it to failures.
#[derive(Debug)]
struct Progress {
    stage: Stage,
}

impl Progress {
    fn starting_at(stage: Stage) -> Self {
        Self { stage }
    }

    fn advance(&mut self, next: Stage) {
        debug!(from = %self.stage, to = %next, "stage transition");
        self.stage = next;
    }

    /// Log a failure against the current stage, then hand the error back.
    fn check<T>(&mut self, result: IngestResult<T>) -> IngestResult<T> {
        result.map_err(|e| {
            error!(
                stage = %self.stage,
                kind = ?e.kind(),
                error = %e,
                "data ingestion failed"
            );
            self.stage = Stage::Failed;
            e
        })
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub source: String,
    pub fetched: usize,
    pub preprocessed: usize,
    pub train: usize,
    pub test: usize,
    pub paths: PersistedPaths,
}

/// One configured ingestion run.
pub struct IngestPipeline {
    config: IngestConfig,
    source: Box<dyn DataSource>,
}

impl IngestPipeline {
    /// Build the pipeline with the reader matching `config.source`.
    pub fn new(config: IngestConfig) -> IngestResult<Self> {
        let source = reader_for(&config.source, config.timeout)?;
        Ok(Self { config, source })
    }

    /// Build the pipeline around an explicit reader.
    pub fn with_source(config: IngestConfig, source: Box<dyn DataSource>) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Fetch, preprocess, split and persist.
    pub async fn run(&self) -> IngestResult<PipelineReport> {
        let mut progress = Progress::starting_at(Stage::SourceSelected);
        self.run_stages(&mut progress).await
    }

    async fn run_stages(&self, progress: &mut Progress) -> IngestResult<PipelineReport> {
        let cfg = &self.config;
        let source_name = self.source.describe();

        let raw = progress.check(self.source.fetch().await)?;
        progress.advance(Stage::DataFetched);

        let processed = progress.check(preprocess(&raw))?;
        progress.advance(Stage::DataPreprocessed);

        let split = progress.check(stratified_split(
            &processed,
            LABEL_COLUMN,
            cfg.test_size,
            cfg.random_state,
        ))?;
        progress.advance(Stage::DataSplit);

        let paths = progress.check(persist_split(&split, &cfg.data_path))?;
        progress.advance(Stage::DataPersisted);

        progress.advance(Stage::Done);
        info!(source = %source_name, "data ingestion pipeline completed successfully");

        Ok(PipelineReport {
            source: source_name,
            fetched: raw.len(),
            preprocessed: processed.len(),
            train: split.train.len(),
            test: split.test.len(),
            paths,
        })
    }
}

/// Run the whole pipeline from a params file and the process environment.
///
/// The environment is read exactly once, when the source is selected.
pub async fn run_from_params(
    params_path: &Path,
    data_path_override: Option<PathBuf>,
) -> IngestResult<PipelineReport> {
    let mut progress = Progress::starting_at(Stage::Init);

    let params = progress.check(Params::load(params_path))?;
    progress.advance(Stage::ConfigLoaded);

    let descriptor = progress.check(SourceDescriptor::from_env(&params.data_ingestion))?;
    match &descriptor {
        SourceDescriptor::Url(_) => info!("data source set to URL"),
        SourceDescriptor::ObjectStorage { .. } => info!("data source set to S3"),
    }

    let mut config = IngestConfig::resolve(&params, descriptor);
    if let Some(data_path) = data_path_override {
        config = config.with_data_path(data_path);
    }

    let pipeline = progress.check(IngestPipeline::new(config))?;
    progress.advance(Stage::SourceSelected);

    pipeline.run_stages(&mut progress).await
}
