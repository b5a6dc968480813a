use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{InferenceOrchestrator, PipelineStage};
use crate::logic::error::PipelineError;
use crate::logic::features::layout::FIELD_LAYOUT;
use crate::logic::features::presets::find_preset;
use crate::logic::features::{FeatureValue, FeatureVector, ImputationTier, RawAttributes};
use crate::logic::model::{Classifier, InferenceError, Label, ModelMetadata};
use crate::logic::reference::{ArtifactPaths, ReferenceData, ReferenceProvider, RoleRateTable};

/// Classifier double that records every vector it is shown
struct StubClassifier {
    schema: Vec<String>,
    outcome: Result<(Label, [f64; 2]), String>,
    calls: AtomicUsize,
    seen: Mutex<Vec<FeatureVector>>,
    metadata: ModelMetadata,
}

impl StubClassifier {
    fn new(schema: Vec<String>, outcome: Result<(Label, [f64; 2]), String>) -> Arc<Self> {
        let metadata = ModelMetadata {
            model_path: "stub".to_string(),
            model_kind: "stub".to_string(),
            version: None,
            features: schema.len(),
            sha256: String::new(),
            loaded_at: chrono::Utc::now(),
        };
        Arc::new(Self {
            schema,
            outcome,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            metadata,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self, features: &FeatureVector) -> Result<(Label, [f64; 2]), InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(features.clone());
        if !features.matches_schema(&self.schema) {
            return Err(InferenceError("vector does not match schema".to_string()));
        }
        self.outcome.clone().map_err(InferenceError)
    }
}

impl Classifier for StubClassifier {
    fn feature_names(&self) -> &[String] {
        &self.schema
    }

    fn predict(&self, features: &FeatureVector) -> Result<Label, InferenceError> {
        self.record(features).map(|(label, _)| label)
    }

    fn predict_probability(&self, features: &FeatureVector) -> Result<[f64; 2], InferenceError> {
        self.record(features).map(|(_, proba)| proba)
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

fn layout_schema() -> Vec<String> {
    FIELD_LAYOUT.iter().map(|spec| spec.canonical.to_string()).collect()
}

fn role_table() -> RoleRateTable {
    RoleRateTable::from_pairs([
        ("Research Director", 1450.0),
        ("Manager", 1550.0),
        ("Sales Executive", 1100.0),
    ])
}

fn orchestrator(stub: &Arc<StubClassifier>, table: RoleRateTable) -> InferenceOrchestrator {
    let classifier: Arc<dyn Classifier> = stub.clone();
    InferenceOrchestrator::new(ReferenceData::new(classifier, table)).unwrap()
}

fn research_director() -> RawAttributes {
    find_preset("Claudio").unwrap().attributes.clone()
}

#[test]
fn test_research_director_end_to_end() {
    let stub = StubClassifier::new(layout_schema(), Ok((Label::NoAttrition, [0.87, 0.13])));
    let engine = orchestrator(&stub, role_table());

    let prediction = engine.run(&research_director()).unwrap();

    assert_eq!(prediction.result.label(), Label::NoAttrition);
    assert!((prediction.result.probability() - 0.13).abs() < 1e-12);
    assert_eq!(prediction.result.verdict(), "attrition unlikely");
    assert_eq!(prediction.monthly_rate.map(|e| e.tier), Some(ImputationTier::RoleAverage));

    let features = &prediction.features;
    assert_eq!(features.len(), 34);
    assert_eq!(features.get_by_name("MonthlyRate"), Some(&FeatureValue::Float(1450.0)));
    assert_eq!(features.get_by_name("EmployeeCount"), Some(&FeatureValue::Int(1)));
    assert_eq!(features.get_by_name("Over18"), Some(&FeatureValue::from("Y")));
    assert_eq!(features.get_by_name("StandardHours"), Some(&FeatureValue::Int(80)));
    assert_eq!(features.get_by_name("EmployeeNumber"), Some(&FeatureValue::Int(0)));
    assert_eq!(features.get_by_name("Age"), Some(&FeatureValue::Int(52)));

    // predict + predict_probability
    assert_eq!(stub.calls(), 2);
}

#[test]
fn test_null_field_rejected_before_classifier() {
    let stub = StubClassifier::new(layout_schema(), Ok((Label::NoAttrition, [0.9, 0.1])));
    let engine = orchestrator(&stub, role_table());

    let mut raw = research_director();
    raw.insert("job_satisfaction", None);

    match engine.run(&raw) {
        Err(PipelineError::IncompleteInput(fields)) => {
            assert_eq!(fields, vec!["JobSatisfaction".to_string()]);
        }
        other => panic!("Expected IncompleteInput, got {:?}", other),
    }
    assert_eq!(stub.calls(), 0);
}

#[test]
fn test_every_null_field_listed_in_schema_order() {
    let stub = StubClassifier::new(layout_schema(), Ok((Label::NoAttrition, [0.9, 0.1])));
    let engine = orchestrator(&stub, role_table());

    let mut raw = research_director();
    raw.insert("performance_rating", None);
    raw.insert("age", None);
    raw.insert("gender", None);

    let err = engine.run(&raw).unwrap_err();
    assert_eq!(err.fields(), vec!["Age", "Gender", "PerformanceRating"]);
    assert!(err.is_recoverable());
    assert_eq!(err.stage(), PipelineStage::Validating);
    assert_eq!(stub.calls(), 0);
}

#[test]
fn test_absent_field_is_missing_feature() {
    let stub = StubClassifier::new(layout_schema(), Ok((Label::NoAttrition, [0.9, 0.1])));
    let engine = orchestrator(&stub, role_table());

    let mut raw = research_director();
    raw.remove("age");

    match engine.run(&raw) {
        Err(PipelineError::MissingFeature(name)) => assert_eq!(name, "Age"),
        other => panic!("Expected MissingFeature, got {:?}", other),
    }
    assert_eq!(stub.calls(), 0);
}

#[test]
fn test_vector_follows_classifier_order() {
    let mut schema = layout_schema();
    schema.reverse();
    schema.swap(3, 17);

    let stub = StubClassifier::new(schema.clone(), Ok((Label::Attrition, [0.3, 0.7])));
    let engine = orchestrator(&stub, role_table());

    let prediction = engine.run(&research_director()).unwrap();
    assert_eq!(prediction.features.names(), schema.as_slice());

    let seen = stub.seen.lock();
    assert!(seen.iter().all(|v| v.names() == schema.as_slice()));
}

#[test]
fn test_subset_schema_drops_extra_fields() {
    let schema: Vec<String> = ["MonthlyIncome", "OverTime", "MonthlyRate"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let stub = StubClassifier::new(schema, Ok((Label::NoAttrition, [0.6, 0.4])));
    let engine = orchestrator(&stub, role_table());

    let prediction = engine.run(&research_director()).unwrap();
    assert_eq!(prediction.features.len(), 3);
    assert_eq!(prediction.features.get_by_name("OverTime"), Some(&FeatureValue::from("No")));
    assert!(prediction.features.get_by_name("Age").is_none());
}

#[test]
fn test_runs_are_deterministic() {
    let stub = StubClassifier::new(layout_schema(), Ok((Label::Attrition, [0.4, 0.6])));
    let engine = orchestrator(&stub, role_table());

    let first = engine.run(&research_director()).unwrap();
    let second = engine.run(&research_director()).unwrap();

    assert_eq!(first.result, second.result);
    assert_eq!(first.features, second.features);
}

#[test]
fn test_unknown_role_with_degraded_table() {
    let stub = StubClassifier::new(layout_schema(), Ok((Label::NoAttrition, [0.9, 0.1])));
    let engine = orchestrator(&stub, RoleRateTable::empty());

    let raw = research_director().with("job_role", "Astronaut");
    let prediction = engine.run(&raw).unwrap();

    assert_eq!(prediction.features.get_by_name("MonthlyRate"), Some(&FeatureValue::Float(800.0)));
    assert_eq!(prediction.monthly_rate.map(|e| e.tier), Some(ImputationTier::FixedDefault));
}

#[test]
fn test_schema_contract_checked_at_startup() {
    let mut schema = layout_schema();
    schema.push("Bogus".to_string());
    let stub: Arc<dyn Classifier> = StubClassifier::new(schema, Ok((Label::NoAttrition, [0.9, 0.1])));

    match InferenceOrchestrator::new(ReferenceData::new(stub, role_table())) {
        Err(PipelineError::SchemaContract { unknown }) => assert_eq!(unknown, vec!["Bogus".to_string()]),
        other => panic!("Expected SchemaContract, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_classifier_failure_is_inference_error() {
    let stub = StubClassifier::new(layout_schema(), Err("session crashed".to_string()));
    let engine = orchestrator(&stub, role_table());

    match engine.run(&research_director()) {
        Err(PipelineError::Inference(reason)) => assert!(reason.contains("session crashed")),
        other => panic!("Expected Inference, got {:?}", other),
    }
}

#[test]
fn test_contradicting_outputs_are_inference_error() {
    let stub = StubClassifier::new(layout_schema(), Ok((Label::Attrition, [0.95, 0.05])));
    let engine = orchestrator(&stub, role_table());

    let err = engine.run(&research_director()).unwrap_err();
    assert!(matches!(err, PipelineError::Inference(_)));
    assert!(!err.is_recoverable());
}

#[test]
fn test_status_counts_requests() {
    let stub = StubClassifier::new(layout_schema(), Ok((Label::NoAttrition, [0.9, 0.1])));
    let engine = orchestrator(&stub, role_table());

    engine.run(&research_director()).unwrap();
    let _ = engine.run(&research_director().with_null("age"));

    let status = engine.status();
    assert_eq!(status.prediction_count, 1);
    assert_eq!(status.rejection_count, 1);
    assert_eq!(status.schema_size, 34);
    assert_eq!(status.role_rate_count, 3);
    assert!(status.role_table_degraded.is_none());
    assert_eq!(status.model.model_kind, "stub");
}

#[test]
fn test_bundled_artifacts_score_every_preset() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("models");
    let provider = ReferenceProvider::new(ArtifactPaths::new(
        root.join("attrition_naive_bayes.json"),
        root.join("monthly_rate_by_job_role.json"),
    ));
    let engine = InferenceOrchestrator::from_provider(&provider).unwrap();
    assert_eq!(engine.reference().role_rates.get("Research Director"), Some(1450.0));

    for preset in crate::logic::features::presets::presets() {
        let prediction = engine.run(&preset.attributes).unwrap();
        let p = prediction.result.probability();
        assert!((0.0..=1.0).contains(&p), "{}: {}", preset.name, p);
        assert_eq!(prediction.result.is_attrition_likely(), p > 0.5, "{}", preset.name);
    }
}
