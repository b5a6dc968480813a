//! Model Artifact Loader
//!
//! Reads the classifier artifact once, verifies its checksum when one is
//! pinned, and parses it as a Naive Bayes JSON artifact. Binary model
//! formats (`.onnx`, `.pkl`) are refused up front with a readable error.

use std::path::Path;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::classifier::{Classifier, ModelMetadata};
use super::naive_bayes::NaiveBayesClassifier;
use crate::logic::error::{PipelineError, PipelineResult};

/// SHA-256 of a byte buffer, lowercase hex
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Extensions of binary model formats this build cannot run
const UNSUPPORTED_EXTENSIONS: &[&str] = &["onnx", "pkl", "pickle", "joblib"];

fn unsupported_format(path: &Path) -> Option<&str> {
    path.extension()
        .and_then(|e| e.to_str())
        .filter(|e| UNSUPPORTED_EXTENSIONS.iter().any(|u| e.eq_ignore_ascii_case(u)))
}

/// Load and verify a classifier artifact
pub fn load_classifier(
    model_path: &Path,
    expected_sha256: Option<&str>,
) -> PipelineResult<Arc<dyn Classifier>> {
    log::info!("Loading classifier from: {}", model_path.display());

    if let Some(ext) = unsupported_format(model_path) {
        return Err(PipelineError::artifact(
            model_path,
            format!("unsupported model format '.{}', expected a Naive Bayes JSON artifact", ext),
        ));
    }

    let bytes = std::fs::read(model_path)
        .map_err(|e| PipelineError::artifact(model_path, e))?;

    let sha256 = sha256_hex(&bytes);
    if let Some(expected) = expected_sha256 {
        if !expected.eq_ignore_ascii_case(&sha256) {
            return Err(PipelineError::artifact(
                model_path,
                format!("checksum mismatch (expected {}, got {})", expected, sha256),
            ));
        }
        log::info!("Classifier checksum verified");
    }

    let metadata = ModelMetadata {
        model_path: model_path.display().to_string(),
        model_kind: "naive_bayes".to_string(),
        version: None,
        features: 0,
        sha256,
        loaded_at: chrono::Utc::now(),
    };

    let json = std::str::from_utf8(&bytes)
        .map_err(|e| PipelineError::artifact(model_path, format!("not UTF-8: {}", e)))?;
    let classifier: Arc<dyn Classifier> = Arc::new(
        NaiveBayesClassifier::from_json(json, metadata)
            .map_err(|e| PipelineError::artifact(model_path, e.0))?,
    );

    log::info!(
        "Classifier ready: {} ({} features, version {})",
        classifier.metadata().model_kind,
        classifier.feature_names().len(),
        classifier.metadata().version.as_deref().unwrap_or("unknown")
    );

    Ok(classifier)
}
