//! Pipeline Errors
//!
//! One error type for the whole assemble → validate → invoke chain.
//! Every variant carries the detail a caller needs to act on it
//! (file path, field name, underlying cause).

use std::path::PathBuf;

use thiserror::Error;

use crate::logic::pipeline::PipelineStage;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Model artifact missing, unreadable, corrupt or failing its checksum.
    #[error("failed to load artifact {}: {reason}", .path.display())]
    ArtifactLoad { path: PathBuf, reason: String },

    /// Classifier declares fields the feature layout can never produce.
    #[error("classifier schema declares fields unknown to the feature layout: {}", .unknown.join(", "))]
    SchemaContract { unknown: Vec<String> },

    /// A declared schema field was never produced by the assembler.
    #[error("feature '{0}' is required by the model but was not provided")]
    MissingFeature(String),

    /// Declared fields are present but still null.
    #[error("input is incomplete, fill in: {}", .0.join(", "))]
    IncompleteInput(Vec<String>),

    /// The classifier failed or returned an inconsistent result.
    #[error("inference failed: {0}")]
    Inference(String),
}

impl PipelineError {
    pub fn artifact(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        PipelineError::ArtifactLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn inference(reason: impl std::fmt::Display) -> Self {
        PipelineError::Inference(reason.to_string())
    }

    /// Stage of the per-request state machine that rejected the request
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::ArtifactLoad { .. } | PipelineError::SchemaContract { .. } => {
                PipelineStage::Collecting
            }
            PipelineError::MissingFeature(_) | PipelineError::IncompleteInput(_) => {
                PipelineStage::Validating
            }
            PipelineError::Inference(_) => PipelineStage::Invoking,
        }
    }

    /// User can fix this by completing the input and retrying
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PipelineError::IncompleteInput(_))
    }

    /// Field names this error refers to, if any
    pub fn fields(&self) -> Vec<String> {
        match self {
            PipelineError::MissingFeature(name) => vec![name.clone()],
            PipelineError::IncompleteInput(names) => names.clone(),
            PipelineError::SchemaContract { unknown } => unknown.clone(),
            _ => Vec::new(),
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
