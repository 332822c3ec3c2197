//! Model registration against an MLflow-compatible registry.
//!
//! Reads the evaluation step's `experiment_info.json`, registers
//! `runs:/<run_id>/<model_path>` as a new version of the named model and moves
//! that version to `Staging`.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use sentiflow_registry::{load_model_info, register_model, MlflowClient};
//!
//! # async fn example() -> sentiflow_registry::RegistryResult<()> {
//! let client = MlflowClient::from_env()?;
//! let info = load_model_info(Path::new("reports/experiment_info.json"))?;
//! let version = register_model(&client, "my_model", &info).await?;
//! println!("registered version {}", version);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `MLFLOW_TRACKING_URI` | Tracking server base URI (required) |
//! | `MLFLOW_TRACKING_USERNAME` | Basic-auth user |
//! | `MLFLOW_TRACKING_PASSWORD` | Basic-auth password or access token |
//! | `MLFLOW_TRACKING_TOKEN` | Bearer token, used without a user name |
//! | `MLFLOW_HTTP_REQUEST_TIMEOUT` | Request timeout in whole seconds, > 0 (default: 30) |

pub mod auth;
pub mod client;
pub mod error;
pub mod register;
pub mod types;

pub use auth::Credentials;
pub use client::MlflowClient;
pub use error::{RegistryError, RegistryResult};
pub use register::{
    load_model_info, register_model, ModelRegistry, DEFAULT_MODEL_INFO_PATH, DEFAULT_MODEL_NAME,
};
pub use types::{ModelInfo, ModelStage, ModelVersion, RegistryConfig};
