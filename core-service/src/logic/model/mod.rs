//! Model Module - Classifier backends
//!
//! The pipeline only talks to `dyn Classifier`; backends are swappable.

pub mod classifier;
pub mod naive_bayes;
pub mod loader;

// Re-export common types
pub use classifier::{Classifier, InferenceError, Label, ModelMetadata};
pub use loader::{load_classifier, sha256_hex};
pub use naive_bayes::NaiveBayesClassifier;
