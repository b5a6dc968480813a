//! Reference Data Provider
//!
//! Owns the two read-only artifacts the pipeline depends on and loads each
//! at most once per process, even under concurrent first access.
//! Callers normally run `load_all()` once at startup and hand the resulting
//! `ReferenceData` to the orchestrator.

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use super::role_rates::RoleRateTable;
use crate::constants;
use crate::logic::error::PipelineResult;
use crate::logic::model::{load_classifier, Classifier};

/// Where the artifacts live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub role_rates: PathBuf,
    /// Pinned SHA-256 of the model file
    #[serde(default)]
    pub model_sha256: Option<String>,
}

impl ArtifactPaths {
    pub fn new(model: impl Into<PathBuf>, role_rates: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            role_rates: role_rates.into(),
            model_sha256: None,
        }
    }

    /// Paths from environment variables with built-in defaults
    pub fn from_env() -> Self {
        Self {
            model: constants::get_model_path(),
            role_rates: constants::get_role_rates_path(),
            model_sha256: constants::get_model_sha256(),
        }
    }
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Resolved artifacts, ready to be injected into the orchestrator
#[derive(Clone)]
pub struct ReferenceData {
    pub classifier: Arc<dyn Classifier>,
    pub role_rates: Arc<RoleRateTable>,
}

impl ReferenceData {
    pub fn new(classifier: Arc<dyn Classifier>, role_rates: RoleRateTable) -> Self {
        Self {
            classifier,
            role_rates: Arc::new(role_rates),
        }
    }
}

impl std::fmt::Debug for ReferenceData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceData")
            .field("model", &self.classifier.metadata())
            .field("roles", &self.role_rates.len())
            .finish()
    }
}

/// Lazily loading, caching provider
pub struct ReferenceProvider {
    paths: ArtifactPaths,
    classifier: OnceCell<Arc<dyn Classifier>>,
    role_rates: OnceCell<Arc<RoleRateTable>>,
}

impl ReferenceProvider {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self {
            paths,
            classifier: OnceCell::new(),
            role_rates: OnceCell::new(),
        }
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// The classifier, loaded on first call. A failed load is not cached,
    /// so a fixed artifact can be picked up by a later call.
    pub fn classifier(&self) -> PipelineResult<Arc<dyn Classifier>> {
        self.classifier
            .get_or_try_init(|| {
                load_classifier(&self.paths.model, self.paths.model_sha256.as_deref())
            })
            .map(Arc::clone)
    }

    /// The role rate table, loaded on first call. Never fails: a missing or
    /// corrupt file yields an empty, degraded table.
    pub fn role_rate_table(&self) -> Arc<RoleRateTable> {
        self.role_rates
            .get_or_init(|| Arc::new(RoleRateTable::load_or_empty(&self.paths.role_rates)))
            .clone()
    }

    /// Explicit startup initialisation of both artifacts
    pub fn load_all(&self) -> PipelineResult<ReferenceData> {
        let classifier = self.classifier()?;
        let role_rates = self.role_rate_table();
        Ok(ReferenceData { classifier, role_rates })
    }
}
