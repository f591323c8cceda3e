//! Loading and sharing of the fitted decision-boundary artifact.
//!
//! The two boundaries are trained outside this repository and shipped as a
//! JSON file. They are loaded at most once per process and shared read-only;
//! a missing or corrupt artifact surfaces as a "model unavailable" error on
//! every request that needs classification.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::analysis::classifier::{ClassifierError, DecisionBoundary};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read boundary model {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("boundary model {} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Degenerate(#[from] ClassifierError),
}

/// The fitted artifact: one boundary separating Saver from Balanced and one
/// separating Balanced from Over-Spender. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryModel {
    pub saver_balanced: DecisionBoundary,
    pub balanced_overspender: DecisionBoundary,
}

impl BoundaryModel {
    /// Rejects artifacts whose boundaries could never be plotted.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        for (name, boundary) in [
            ("saver_balanced", &self.saver_balanced),
            ("balanced_overspender", &self.balanced_overspender),
        ] {
            if boundary.coefficients[1] == 0.0 {
                return Err(ClassifierError::DegenerateBoundary {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Lazily-initialized, process-wide accessor for the boundary artifact.
///
/// The file is read on first use and cached for the lifetime of the process.
/// A failed load is reported to the caller and retried on the next request
/// rather than being cached.
#[derive(Clone)]
pub struct ModelStore {
    path: Arc<PathBuf>,
    cell: Arc<OnceCell<Arc<BoundaryModel>>>,
}

impl ModelStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path: Arc::new(path),
            cell: Arc::new(OnceCell::new()),
        }
    }

    pub async fn get(&self) -> Result<Arc<BoundaryModel>, ModelError> {
        let model = self
            .cell
            .get_or_try_init(|| load_model(self.path.as_ref()))
            .await?;
        Ok(Arc::clone(model))
    }
}

async fn load_model(path: &Path) -> Result<Arc<BoundaryModel>, ModelError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ModelError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let model: BoundaryModel =
        serde_json::from_slice(&bytes).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    model.validate()?;
    tracing::info!(path = %path.display(), "loaded boundary model");
    Ok(Arc::new(model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ARTIFACT: &str = r#"{
        "saver_balanced": { "coefficients": [0.02, 0.0003], "intercept": 2.0 },
        "balanced_overspender": { "coefficients": [0.015, 0.0002], "intercept": -3.0 }
    }"#;

    #[test]
    fn artifact_json_round_trips() {
        let model: BoundaryModel = serde_json::from_str(ARTIFACT).unwrap();
        assert_eq!(model.saver_balanced.coefficients, [0.02, 0.0003]);
        assert_eq!(model.balanced_overspender.intercept, -3.0);
        assert!(model.validate().is_ok());

        let encoded = serde_json::to_string(&model).unwrap();
        let decoded: BoundaryModel = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, model);
    }

    #[test]
    fn validation_rejects_degenerate_boundaries() {
        let mut model: BoundaryModel = serde_json::from_str(ARTIFACT).unwrap();
        model.balanced_overspender.coefficients[1] = 0.0;
        assert!(matches!(
            model.validate(),
            Err(ClassifierError::DegenerateBoundary { name }) if name == "balanced_overspender"
        ));
    }

    #[tokio::test]
    async fn store_loads_once_and_shares_the_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boundary_model.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(ARTIFACT.as_bytes()).unwrap();

        let store = ModelStore::new(path);
        let first = store.get().await.unwrap();
        let second = store.get().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn missing_artifact_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("missing.json"));
        assert!(matches!(store.get().await, Err(ModelError::Read { .. })));
    }

    #[tokio::test]
    async fn corrupt_artifact_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boundary_model.json");
        std::fs::write(&path, b"not json").unwrap();

        let store = ModelStore::new(path);
        assert!(matches!(store.get().await, Err(ModelError::Parse { .. })));
    }
}
