//! Attrition Core - feature assembly & inference pipeline
//!
//! Raw employee attributes in, attrition verdict out.
//! Shared by the `attrition-predict` CLI and the HTTP server.

pub mod constants;
pub mod logic;

pub use logic::error::{PipelineError, PipelineResult};
pub use logic::features::{FeatureValue, FeatureVector, RawAttributes};
pub use logic::model::{Classifier, Label};
pub use logic::pipeline::{EngineStatus, InferenceOrchestrator, Prediction, PredictionResult};
pub use logic::reference::{ArtifactPaths, ReferenceData, ReferenceProvider, RoleRateTable};
