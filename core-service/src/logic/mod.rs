//! Logic Module - Business Logic & Engines
//!
//! ## Architecture
//! - `features/` - Feature assembly (layout, imputation, vector, presets)
//! - `reference/` - Read-only artifacts (classifier, role rate table)
//! - `model/` - Classifier trait and the Naive Bayes backend
//! - `pipeline/` - Per-request orchestration
//! - `error` - Pipeline error type

pub mod error;

pub mod features;
pub mod reference;
pub mod model;
pub mod pipeline;
