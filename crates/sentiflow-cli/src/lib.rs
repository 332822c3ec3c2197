//! Shared plumbing for the `data-ingestion` and `register-model` binaries.

use anyhow::Context;

pub mod exit_codes;
pub mod logging;

/// Single-threaded runtime; the pipeline stages run strictly one after another.
pub fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}
