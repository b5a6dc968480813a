//! Prediction Results

use serde::{Deserialize, Serialize};

use crate::logic::features::{FeatureVector, MonthlyRateEstimate};
use crate::logic::model::Label;

/// Interpreted classifier output. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    label: Label,
    /// P(attrition), in [0, 1]
    probability: f64,
}

impl PredictionResult {
    pub(crate) fn new(label: Label, probability: f64) -> Self {
        Self { label, probability }
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn is_attrition_likely(&self) -> bool {
        self.label == Label::Attrition
    }

    pub fn verdict(&self) -> &'static str {
        match self.label {
            Label::Attrition => "attrition likely",
            Label::NoAttrition => "attrition unlikely",
        }
    }

    /// Probability as a percentage with two decimals, e.g. "42.17%"
    pub fn probability_percent(&self) -> String {
        format!("{:.2}%", self.probability * 100.0)
    }
}

/// Everything one successful pipeline run produced
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub result: PredictionResult,
    /// The exact vector the classifier saw
    pub features: FeatureVector,
    pub monthly_rate: Option<MonthlyRateEstimate>,
    pub inference_time_us: u64,
}
