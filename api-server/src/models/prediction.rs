//! Prediction response model

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use attrition_core::logic::features::presets::Preset;
use attrition_core::logic::features::MonthlyRateEstimate;
use attrition_core::{Prediction, RawAttributes};

#[derive(Debug, Clone, Serialize)]
pub struct PredictionResponse {
    pub id: Uuid,
    /// "Yes" / "No", as the attrition column is encoded
    pub attrition: &'static str,
    pub verdict: &'static str,
    pub probability: f64,
    pub probability_percent: String,
    pub monthly_rate: Option<MonthlyRateEstimate>,
    /// Exact vector the classifier saw
    pub features: serde_json::Value,
    pub inference_time_us: u64,
    pub created_at: DateTime<Utc>,
}

impl From<Prediction> for PredictionResponse {
    fn from(prediction: Prediction) -> Self {
        let result = prediction.result;
        Self {
            id: Uuid::new_v4(),
            attrition: result.label().as_yes_no(),
            verdict: result.verdict(),
            probability: result.probability(),
            probability_percent: result.probability_percent(),
            monthly_rate: prediction.monthly_rate,
            features: prediction.features.to_log_entry(),
            inference_time_us: prediction.inference_time_us,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PresetSummary {
    pub name: String,
    pub attributes: RawAttributes,
}

impl From<&Preset> for PresetSummary {
    fn from(preset: &Preset) -> Self {
        Self {
            name: preset.name.clone(),
            attributes: preset.attributes.clone(),
        }
    }
}
