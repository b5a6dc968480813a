//! Pipeline Module - per-request inference flow
//!
//! raw attributes → assemble → validate/reorder → classifier → result

pub mod stage;
pub mod result;
pub mod orchestrator;

#[cfg(test)]
mod tests;

pub use orchestrator::{EngineStatus, InferenceOrchestrator};
pub use result::{Prediction, PredictionResult};
pub use stage::PipelineStage;
