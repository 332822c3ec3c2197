//! Model registration: read the evaluation output, create a version, stage it.

use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use crate::error::{RegistryError, RegistryResult};
use crate::types::{ModelInfo, ModelStage, ModelVersion};

/// Default location of the evaluation step's output.
pub const DEFAULT_MODEL_INFO_PATH: &str = "reports/experiment_info.json";

/// Default registered model name.
pub const DEFAULT_MODEL_NAME: &str = "my_model";

/// Model registry operations used by [`register_model`].
#[async_trait]
pub trait ModelRegistry: Send + Sync {
    /// Register `source` as a new version of `name`.
    async fn create_model_version(
        &self,
        name: &str,
        source: &str,
        run_id: &str,
    ) -> RegistryResult<ModelVersion>;

    /// Move a version to `stage`, leaving other versions where they are.
    async fn transition_stage(
        &self,
        name: &str,
        version: &str,
        stage: ModelStage,
    ) -> RegistryResult<ModelVersion>;
}

/// Read `{"run_id": ..., "model_path": ...}` from disk.
pub fn load_model_info(path: &Path) -> RegistryResult<ModelInfo> {
    let content = std::fs::read_to_string(path).map_err(|e| RegistryError::ModelInfo {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let info: ModelInfo =
        serde_json::from_str(&content).map_err(|e| RegistryError::ModelInfo {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if info.run_id.trim().is_empty() {
        return Err(RegistryError::ModelInfo {
            path: path.to_path_buf(),
            message: "run_id is empty".to_string(),
        });
    }

    info!(path = %path.display(), run_id = %info.run_id, "model info loaded");
    Ok(info)
}

/// Register the model described by `info` and move it to Staging.
///
/// Returns the new version number.
pub async fn register_model(
    registry: &dyn ModelRegistry,
    model_name: &str,
    info: &ModelInfo,
) -> RegistryResult<String> {
    if model_name.trim().is_empty() {
        return Err(RegistryError::Config {
            message: "model name must not be empty".to_string(),
        });
    }

    let source = info.source_uri();
    let created = registry
        .create_model_version(model_name, &source, &info.run_id)
        .await?;

    registry
        .transition_stage(model_name, &created.version, ModelStage::Staging)
        .await?;

    info!(
        "model '{}' version {} registered and moved to Staging",
        model_name, created.version
    );
    Ok(created.version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeRegistry {
        calls: Mutex<Vec<String>>,
        fail_transition: bool,
    }

    #[async_trait]
    impl ModelRegistry for FakeRegistry {
        async fn create_model_version(
            &self,
            name: &str,
            source: &str,
            run_id: &str,
        ) -> RegistryResult<ModelVersion> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("create {} {} {}", name, source, run_id));
            Ok(ModelVersion {
                name: name.to_string(),
                version: "4".to_string(),
                current_stage: Some("None".to_string()),
                source: Some(source.to_string()),
                run_id: Some(run_id.to_string()),
                status: None,
            })
        }

        async fn transition_stage(
            &self,
            name: &str,
            version: &str,
            stage: ModelStage,
        ) -> RegistryResult<ModelVersion> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("transition {} {} {}", name, version, stage));
            if self.fail_transition {
                return Err(RegistryError::Api {
                    status: 400,
                    error_code: "INVALID_PARAMETER_VALUE".into(),
                    message: "bad stage".into(),
                });
            }
            Ok(ModelVersion {
                name: name.to_string(),
                version: version.to_string(),
                current_stage: Some(stage.to_string()),
                source: None,
                run_id: None,
                status: None,
            })
        }
    }

    fn info() -> ModelInfo {
        ModelInfo {
            run_id: "run-1".into(),
            model_path: "model".into(),
        }
    }

    #[tokio::test]
    async fn test_register_creates_then_stages() {
        let registry = FakeRegistry::default();
        let version = register_model(&registry, "my_model", &info()).await.unwrap();

        assert_eq!(version, "4");
        let calls = registry.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![
                "create my_model runs:/run-1/model run-1".to_string(),
                "transition my_model 4 Staging".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_transition_failure_propagates() {
        let registry = FakeRegistry {
            fail_transition: true,
            ..Default::default()
        };
        let err = register_model(&registry, "my_model", &info())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Api { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_empty_model_name_rejected() {
        let registry = FakeRegistry::default();
        let err = register_model(&registry, " ", &info()).await.unwrap_err();
        assert!(matches!(err, RegistryError::Config { .. }));
        assert!(registry.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_load_model_info() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("experiment_info.json");
        std::fs::write(&path, r#"{"run_id": "abc", "model_path": "model"}"#).unwrap();

        let info = load_model_info(&path).unwrap();
        assert_eq!(info.run_id, "abc");
        assert_eq!(info.model_path, "model");
    }

    #[test]
    fn test_load_model_info_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_model_info(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, RegistryError::ModelInfo { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_load_model_info_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("experiment_info.json");
        std::fs::write(&path, r#"{"run_id": "abc"}"#).unwrap();
        assert!(matches!(
            load_model_info(&path),
            Err(RegistryError::ModelInfo { .. })
        ));

        std::fs::write(&path, r#"{"run_id": "", "model_path": "model"}"#).unwrap();
        assert!(matches!(
            load_model_info(&path),
            Err(RegistryError::ModelInfo { .. })
        ));
    }
}
