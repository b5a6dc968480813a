//! Classifier Trait
//!
//! The trained model is an opaque, read-only artifact. The pipeline only
//! needs its declared schema and the two prediction calls.

use serde::{Deserialize, Serialize};

use crate::logic::features::FeatureVector;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Binary outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    NoAttrition,
    Attrition,
}

impl Label {
    /// Map a raw class index (0/1) to a label
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(Label::NoAttrition),
            1 => Some(Label::Attrition),
            _ => None,
        }
    }

    pub fn class_index(&self) -> usize {
        match self {
            Label::NoAttrition => 0,
            Label::Attrition => 1,
        }
    }

    /// "Yes"/"No" as the attrition column is encoded in the dataset
    pub fn as_yes_no(&self) -> &'static str {
        match self {
            Label::NoAttrition => "No",
            Label::Attrition => "Yes",
        }
    }
}

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub model_kind: String,       // "naive_bayes"
    pub version: Option<String>,
    pub features: usize,
    pub sha256: String,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub struct InferenceError(pub String);

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InferenceError: {}", self.0)
    }
}

impl std::error::Error for InferenceError {}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Trait for classifier backends
///
/// Implementations are shared across threads and never mutated after load.
pub trait Classifier: Send + Sync {
    /// Feature names in the exact order the model was fit on
    fn feature_names(&self) -> &[String];

    /// Predicted label for a single row
    fn predict(&self, features: &FeatureVector) -> Result<Label, InferenceError>;

    /// `[p(no attrition), p(attrition)]` for a single row
    fn predict_probability(&self, features: &FeatureVector) -> Result<[f64; 2], InferenceError>;

    fn metadata(&self) -> &ModelMetadata;
}
