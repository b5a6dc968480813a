//! Inference Orchestrator
//!
//! validate → reorder → null check → invoke → interpret.
//! Holds the injected reference data; no state is kept between requests
//! apart from counters for the status report.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::result::{Prediction, PredictionResult};
use super::stage::PipelineStage;
use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::features::layout::{validate_schema_contract, LayoutInfo};
use crate::logic::features::{assemble, CandidateFeatures, FeatureValue, FeatureVector, RawAttributes};
use crate::logic::model::{Label, ModelMetadata};
use crate::logic::reference::{ReferenceData, ReferenceProvider};

/// Tolerance for probability pairs coming out of float32 graphs
const PROBABILITY_TOLERANCE: f64 = 1e-3;

// ============================================================================
// STATUS
// ============================================================================

/// Engine Status for callers / health endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub feature_version: u8,
    pub layout_hash: u32,
    pub schema_size: usize,
    pub model: ModelMetadata,
    pub role_rate_count: usize,
    pub role_table_degraded: Option<String>,
    pub prediction_count: u64,
    pub rejection_count: u64,
    pub avg_latency_ms: f32,
}

#[derive(Debug, Default)]
struct InferenceStats {
    predictions: AtomicU64,
    rejections: AtomicU64,
    latency_sum_us: AtomicU64,
}

// ============================================================================
// PIPELINE STEPS
// ============================================================================

/// Project the candidate map onto the schema order.
/// Fails on the first schema field the assembler never produced; extra
/// candidate fields are dropped.
pub fn reorder<'a, S: AsRef<str>>(
    schema: &'a [S],
    candidate: &'a CandidateFeatures,
) -> PipelineResult<Vec<(&'a str, Option<&'a FeatureValue>)>> {
    schema
        .iter()
        .map(|name| {
            let name = name.as_ref();
            candidate
                .get(name)
                .map(|value| (name, value))
                .ok_or_else(|| PipelineError::MissingFeature(name.to_string()))
        })
        .collect()
}

/// Reject if any field is null, listing every null field in schema order
pub fn check_complete(ordered: Vec<(&str, Option<&FeatureValue>)>) -> PipelineResult<FeatureVector> {
    let nulls: Vec<String> = ordered
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name.to_string())
        .collect();

    if !nulls.is_empty() {
        return Err(PipelineError::IncompleteInput(nulls));
    }

    Ok(FeatureVector::from_pairs(
        ordered
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v.clone()))),
    ))
}

/// Check the raw outputs agree with each other and build the result
pub fn interpret(label: Label, proba: [f64; 2]) -> PipelineResult<PredictionResult> {
    let [p0, p1] = proba;

    if proba.iter().any(|p| !p.is_finite() || *p < -PROBABILITY_TOLERANCE || *p > 1.0 + PROBABILITY_TOLERANCE) {
        return Err(PipelineError::inference(format!("probabilities out of range: {:?}", proba)));
    }
    if (p0 + p1 - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(PipelineError::inference(format!("probabilities do not sum to 1: {:?}", proba)));
    }

    let disagrees = match label {
        Label::Attrition => p1 + PROBABILITY_TOLERANCE < p0,
        Label::NoAttrition => p0 + PROBABILITY_TOLERANCE < p1,
    };
    if disagrees {
        return Err(PipelineError::inference(format!(
            "predicted label {:?} contradicts probabilities {:?}",
            label, proba
        )));
    }

    Ok(PredictionResult::new(label, p1.clamp(0.0, 1.0)))
}

// ============================================================================
// ORCHESTRATOR
// ============================================================================

pub struct InferenceOrchestrator {
    reference: ReferenceData,
    stats: InferenceStats,
}

impl InferenceOrchestrator {
    /// Build the orchestrator, checking the classifier schema against the
    /// feature layout before any request is served.
    pub fn new(reference: ReferenceData) -> PipelineResult<Self> {
        validate_schema_contract(reference.classifier.feature_names())?;

        if let Some(reason) = reference.role_rates.degraded_reason() {
            log::warn!("Serving with degraded role rate table: {}", reason);
        }

        Ok(Self {
            reference,
            stats: InferenceStats::default(),
        })
    }

    /// Load everything from a provider (one-time startup step)
    pub fn from_provider(provider: &ReferenceProvider) -> PipelineResult<Self> {
        Self::new(provider.load_all()?)
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn schema(&self) -> &[String] {
        self.reference.classifier.feature_names()
    }

    /// Assembling
    pub fn assemble(&self, raw: &RawAttributes) -> CandidateFeatures {
        assemble(raw, &self.reference.role_rates)
    }

    /// Validating: schema check, reorder, null check
    pub fn validate(&self, candidate: &CandidateFeatures) -> PipelineResult<FeatureVector> {
        let ordered = reorder(self.schema(), candidate)?;
        check_complete(ordered)
    }

    /// Invoking + interpretation
    pub fn invoke(&self, vector: &FeatureVector) -> PipelineResult<PredictionResult> {
        let classifier = &self.reference.classifier;

        let label = classifier.predict(vector).map_err(|e| PipelineError::inference(e.0))?;
        let proba = classifier
            .predict_probability(vector)
            .map_err(|e| PipelineError::inference(e.0))?;

        interpret(label, proba)
    }

    /// Full pipeline for one request
    pub fn run(&self, raw: &RawAttributes) -> PipelineResult<Prediction> {
        let start = Instant::now();
        let outcome = self.run_stages(raw, start);

        match &outcome {
            Ok(prediction) => {
                self.stats.predictions.fetch_add(1, Ordering::Relaxed);
                self.stats.latency_sum_us.fetch_add(prediction.inference_time_us, Ordering::Relaxed);
                log::info!(
                    "[{}] {} ({})",
                    PipelineStage::Done,
                    prediction.result.verdict(),
                    prediction.result.probability_percent()
                );
            }
            Err(e) => {
                self.stats.rejections.fetch_add(1, Ordering::Relaxed);
                if e.is_recoverable() {
                    log::info!("[{}] at {}: {}", PipelineStage::Rejected, e.stage(), e);
                } else {
                    log::error!("[{}] at {}: {}", PipelineStage::Rejected, e.stage(), e);
                }
            }
        }

        outcome
    }

    fn run_stages(&self, raw: &RawAttributes, start: Instant) -> PipelineResult<Prediction> {
        log::debug!("[{}] {} attributes received", PipelineStage::Collecting, raw.len());

        let candidate = self.assemble(raw);
        log::debug!(
            "[{}] {} candidate features, MonthlyRate via {:?}",
            PipelineStage::Assembling,
            candidate.len(),
            candidate.monthly_rate().map(|e| e.tier)
        );

        let features = self.validate(&candidate)?;
        log::debug!("[{}] {} features in schema order", PipelineStage::Validating, features.len());

        let result = self.invoke(&features)?;
        log::debug!("[{}] label {:?}", PipelineStage::Invoking, result.label());

        Ok(Prediction {
            result,
            features,
            monthly_rate: candidate.monthly_rate(),
            inference_time_us: start.elapsed().as_micros() as u64,
        })
    }

    pub fn status(&self) -> EngineStatus {
        let layout = LayoutInfo::current();
        let count = self.stats.predictions.load(Ordering::Relaxed);
        let sum = self.stats.latency_sum_us.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        EngineStatus {
            feature_version: layout.version,
            layout_hash: layout.hash,
            schema_size: self.schema().len(),
            model: self.reference.classifier.metadata().clone(),
            role_rate_count: self.reference.role_rates.len(),
            role_table_degraded: self.reference.role_rates.degraded_reason().map(str::to_string),
            prediction_count: count,
            rejection_count: self.stats.rejections.load(Ordering::Relaxed),
            avg_latency_ms: avg,
        }
    }
}

impl std::fmt::Debug for InferenceOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceOrchestrator")
            .field("reference", &self.reference)
            .field("stats", &self.stats)
            .finish()
    }
}
