//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Artifact locations can be overridden through environment variables.

use std::path::PathBuf;

/// Default classifier artifact (relative to the working directory)
pub const DEFAULT_MODEL_PATH: &str = "models/attrition_naive_bayes.json";

/// Default job role → average MonthlyRate table
pub const DEFAULT_ROLE_RATES_PATH: &str = "models/monthly_rate_by_job_role.json";

/// MonthlyRate used when the role table is empty
pub const DEFAULT_MONTHLY_RATE: f64 = 800.0;

// ============================================
// Organization constants (fixed in the training data)
// ============================================

pub const EMPLOYEE_COUNT: i64 = 1;
pub const OVER_18: &str = "Y";
pub const STANDARD_HOURS: i64 = 80;
/// Placeholder identifier, carries no meaning for the model
pub const EMPLOYEE_NUMBER: i64 = 0;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Attrition Predictor";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get classifier artifact path from environment or use default
pub fn get_model_path() -> PathBuf {
    std::env::var("ATTRITION_MODEL_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_artifact(DEFAULT_MODEL_PATH))
}

/// Get role rate table path from environment or use default
pub fn get_role_rates_path() -> PathBuf {
    std::env::var("ATTRITION_ROLE_RATES_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_artifact(DEFAULT_ROLE_RATES_PATH))
}

/// Expected SHA-256 of the classifier artifact, if pinned
pub fn get_model_sha256() -> Option<String> {
    std::env::var("ATTRITION_MODEL_SHA256")
        .ok()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
}

/// Resolve a default artifact: working directory first, then the
/// platform data directory (e.g. ~/.local/share/attrition/models/...)
fn default_artifact(relative: &str) -> PathBuf {
    let local = PathBuf::from(relative);
    if local.exists() {
        return local;
    }

    dirs::data_local_dir()
        .map(|dir| dir.join("attrition").join(relative))
        .filter(|p| p.exists())
        .unwrap_or(local)
}
