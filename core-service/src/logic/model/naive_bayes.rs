//! Naive Bayes Classifier - native JSON artifact
//!
//! Mixed Naive Bayes: Gaussian likelihoods for numeric columns, log
//! probability tables for categorical columns. The artifact is exported
//! from the training pipeline as JSON:
//!
//! ```json
//! {
//!   "model_type": "naive_bayes",
//!   "version": "2026-02-02",
//!   "class_prior": [0.84, 0.16],
//!   "var_smoothing": 1e-9,
//!   "features": [
//!     { "name": "Age", "kind": "gaussian", "mean": [37.6, 33.6], "var": [79.5, 94.3] },
//!     { "name": "OverTime", "kind": "categorical",
//!       "log_prob": { "Yes": [-1.3, -0.6], "No": [-0.3, -0.8] } }
//!   ]
//! }
//! ```
//!
//! Feature order in the artifact is the declared schema.

use std::collections::HashMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::classifier::{Classifier, InferenceError, Label, ModelMetadata};
use crate::logic::features::FeatureVector;

// ============================================================================
// ARTIFACT FORMAT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveBayesArtifact {
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    pub class_prior: [f64; 2],
    #[serde(default = "default_var_smoothing")]
    pub var_smoothing: f64,
    pub features: Vec<FeatureModel>,
}

fn default_var_smoothing() -> f64 {
    1e-9
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureModel {
    Gaussian {
        name: String,
        mean: [f64; 2],
        var: [f64; 2],
    },
    Categorical {
        name: String,
        log_prob: HashMap<String, [f64; 2]>,
        /// Used for categories never seen in training; skipped if absent
        #[serde(default)]
        unknown_log_prob: Option<[f64; 2]>,
    },
}

impl FeatureModel {
    pub fn name(&self) -> &str {
        match self {
            FeatureModel::Gaussian { name, .. } | FeatureModel::Categorical { name, .. } => name,
        }
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

#[derive(Debug)]
pub struct NaiveBayesClassifier {
    artifact: NaiveBayesArtifact,
    feature_names: Vec<String>,
    class_log_prior: [f64; 2],
    epsilon: f64,
    metadata: ModelMetadata,
}

impl NaiveBayesClassifier {
    /// Validate an artifact and build the classifier
    pub fn new(artifact: NaiveBayesArtifact, metadata: ModelMetadata) -> Result<Self, InferenceError> {
        if let Some(kind) = artifact.model_type.as_deref() {
            if kind != "naive_bayes" {
                return Err(InferenceError(format!("unsupported model_type '{}'", kind)));
            }
        }

        if artifact.features.is_empty() {
            return Err(InferenceError("artifact declares no features".to_string()));
        }

        let prior_sum: f64 = artifact.class_prior.iter().sum();
        if artifact.class_prior.iter().any(|p| !p.is_finite() || *p <= 0.0)
            || (prior_sum - 1.0).abs() > 1e-6
        {
            return Err(InferenceError(format!(
                "class_prior must be two positive values summing to 1, got {:?}",
                artifact.class_prior
            )));
        }

        let mut max_var = 0.0f64;
        for feature in &artifact.features {
            match feature {
                FeatureModel::Gaussian { name, mean, var } => {
                    if mean.iter().chain(var.iter()).any(|v| !v.is_finite()) || var.iter().any(|v| *v < 0.0) {
                        return Err(InferenceError(format!("invalid Gaussian parameters for '{}'", name)));
                    }
                    max_var = max_var.max(var[0]).max(var[1]);
                }
                FeatureModel::Categorical { name, log_prob, .. } => {
                    if log_prob.is_empty() {
                        return Err(InferenceError(format!("categorical feature '{}' has no categories", name)));
                    }
                }
            }
        }

        let feature_names: Vec<String> = artifact.features.iter().map(|f| f.name().to_string()).collect();
        let class_log_prior = [artifact.class_prior[0].ln(), artifact.class_prior[1].ln()];
        // Same stabiliser as the training library: a fraction of the largest variance
        let epsilon = (artifact.var_smoothing * max_var).max(f64::MIN_POSITIVE);

        Ok(Self {
            artifact,
            feature_names,
            class_log_prior,
            epsilon,
            metadata,
        })
    }

    pub fn from_json(json: &str, metadata: ModelMetadata) -> Result<Self, InferenceError> {
        let artifact: NaiveBayesArtifact = serde_json::from_str(json)
            .map_err(|e| InferenceError(format!("invalid Naive Bayes artifact: {}", e)))?;
        let mut metadata = metadata;
        metadata.version = artifact.version.clone();
        metadata.features = artifact.features.len();
        Self::new(artifact, metadata)
    }

    /// Unnormalised log P(class, x) for both classes
    pub fn joint_log_likelihood(&self, features: &FeatureVector) -> Result<[f64; 2], InferenceError> {
        if !features.matches_schema(&self.feature_names) {
            return Err(InferenceError(format!(
                "feature vector does not match model schema ({} fields given, {} expected)",
                features.len(),
                self.feature_names.len()
            )));
        }

        let mut joint = self.class_log_prior;

        for (model, value) in self.artifact.features.iter().zip(features.values()) {
            match model {
                FeatureModel::Gaussian { name, mean, var } => {
                    let x = value.as_f64().ok_or_else(|| {
                        InferenceError(format!("feature '{}' expects a number, got '{}'", name, value))
                    })?;
                    for c in 0..2 {
                        let v = var[c] + self.epsilon;
                        joint[c] += -0.5 * (2.0 * PI * v).ln() - (x - mean[c]).powi(2) / (2.0 * v);
                    }
                }
                FeatureModel::Categorical { name, log_prob, unknown_log_prob } => {
                    let key = value.category_key();
                    match log_prob.get(&key).or(unknown_log_prob.as_ref()) {
                        Some(lp) => {
                            joint[0] += lp[0];
                            joint[1] += lp[1];
                        }
                        None => log::debug!("Unseen category '{}' for '{}', feature skipped", key, name),
                    }
                }
            }
        }

        if joint.iter().any(|j| j.is_nan()) {
            return Err(InferenceError("joint log-likelihood is NaN".to_string()));
        }

        Ok(joint)
    }
}

/// Normalise two log-likelihoods into probabilities (log-sum-exp)
fn softmax2(joint: [f64; 2]) -> [f64; 2] {
    let max = joint[0].max(joint[1]);
    let e0 = (joint[0] - max).exp();
    let e1 = (joint[1] - max).exp();
    let sum = e0 + e1;
    [e0 / sum, e1 / sum]
}

impl Classifier for NaiveBayesClassifier {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, features: &FeatureVector) -> Result<Label, InferenceError> {
        let joint = self.joint_log_likelihood(features)?;
        // Ties resolve to the first class
        Ok(if joint[1] > joint[0] { Label::Attrition } else { Label::NoAttrition })
    }

    fn predict_probability(&self, features: &FeatureVector) -> Result<[f64; 2], InferenceError> {
        let joint = self.joint_log_likelihood(features)?;
        Ok(softmax2(joint))
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}
