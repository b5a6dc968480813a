//! Feature Assembler
//!
//! Raw form attributes → candidate feature map keyed by canonical names.
//! Ordering is not enforced here, the orchestrator projects the map onto
//! the classifier schema.

use std::collections::HashMap;

use serde::Serialize;

use crate::constants;
use super::imputation::{estimate_monthly_rate, MonthlyRateEstimate};
use super::layout::{
    canonical_for_input, EMPLOYEE_COUNT, EMPLOYEE_NUMBER, JOB_ROLE_KEY, MONTHLY_RATE, OVER_18,
    STANDARD_HOURS,
};
use super::value::{FeatureValue, RawAttributes};
use crate::logic::reference::RoleRateTable;

/// Unordered features produced by the assembler.
/// `None` values are collected fields the user left empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandidateFeatures {
    values: HashMap<String, Option<FeatureValue>>,
    monthly_rate: Option<MonthlyRateEstimate>,
}

impl CandidateFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: Option<FeatureValue>) {
        self.values.insert(name.to_string(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Option<FeatureValue>> {
        self.values.remove(name)
    }

    /// `None` if never produced, `Some(None)` if produced but null
    pub fn get(&self, name: &str) -> Option<Option<&FeatureValue>> {
        self.values.get(name).map(|v| v.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// How MonthlyRate was estimated, if the assembler produced it
    pub fn monthly_rate(&self) -> Option<MonthlyRateEstimate> {
        self.monthly_rate
    }
}

/// Organization constants injected into every vector
pub fn organization_constants() -> [(&'static str, FeatureValue); 4] {
    [
        (EMPLOYEE_COUNT, FeatureValue::Int(constants::EMPLOYEE_COUNT)),
        (OVER_18, FeatureValue::Text(constants::OVER_18.to_string())),
        (STANDARD_HOURS, FeatureValue::Int(constants::STANDARD_HOURS)),
        (EMPLOYEE_NUMBER, FeatureValue::Int(constants::EMPLOYEE_NUMBER)),
    ]
}

/// Assemble candidate features. Never fails: every path ends in a value.
pub fn assemble(raw: &RawAttributes, table: &RoleRateTable) -> CandidateFeatures {
    let mut candidate = CandidateFeatures::new();

    // 1. Copy collected fields under their canonical names
    for (key, value) in raw.iter() {
        match canonical_for_input(key) {
            Some(canonical) => candidate.insert(canonical, value.cloned()),
            None => log::debug!("Ignoring unknown attribute '{}'", key),
        }
    }

    // 2. Derive MonthlyRate from the job role
    let job_role = raw.value(JOB_ROLE_KEY).and_then(FeatureValue::as_str);
    let estimate = estimate_monthly_rate(job_role, table);
    candidate.insert(MONTHLY_RATE, Some(FeatureValue::Float(estimate.value)));
    candidate.monthly_rate = Some(estimate);

    // 3. Constants always win over anything already present
    inject_constants(&mut candidate);

    candidate
}

/// Overwrite the organization constants, whatever the candidate holds
pub fn inject_constants(candidate: &mut CandidateFeatures) {
    for (name, value) in organization_constants() {
        candidate.insert(name, Some(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::imputation::ImputationTier;

    fn table() -> RoleRateTable {
        RoleRateTable::from_pairs([("Research Director", 1450.0), ("Manager", 1550.0)])
    }

    #[test]
    fn test_renames_collected_fields() {
        let raw = RawAttributes::new()
            .with("age", 52)
            .with("years_with_curr_manager", 7)
            .with("job_role", "Research Director");

        let candidate = assemble(&raw, &table());
        assert_eq!(candidate.get("Age"), Some(Some(&FeatureValue::Int(52))));
        assert_eq!(candidate.get("YearsWithCurrManager"), Some(Some(&FeatureValue::Int(7))));
        assert!(!candidate.contains("age"));
    }

    #[test]
    fn test_derives_monthly_rate() {
        let raw = RawAttributes::new().with("job_role", "Research Director");
        let candidate = assemble(&raw, &table());

        assert_eq!(candidate.get(MONTHLY_RATE), Some(Some(&FeatureValue::Float(1450.0))));
        assert_eq!(candidate.monthly_rate().map(|e| e.tier), Some(ImputationTier::RoleAverage));
    }

    #[test]
    fn test_null_job_role_falls_back_to_mean() {
        let raw = RawAttributes::new().with_null("job_role");
        let candidate = assemble(&raw, &table());

        assert_eq!(candidate.get(MONTHLY_RATE), Some(Some(&FeatureValue::Float(1500.0))));
        assert_eq!(candidate.get("JobRole"), Some(None));
    }

    #[test]
    fn test_constants_injected_with_empty_table() {
        let mut raw = RawAttributes::new();
        raw.insert("age", Some(FeatureValue::Int(30)));

        let candidate = assemble(&raw, &RoleRateTable::empty());
        assert_eq!(candidate.get(EMPLOYEE_COUNT), Some(Some(&FeatureValue::Int(1))));
        assert_eq!(candidate.get(OVER_18), Some(Some(&FeatureValue::from("Y"))));
        assert_eq!(candidate.get(STANDARD_HOURS), Some(Some(&FeatureValue::Int(80))));
        assert_eq!(candidate.get(EMPLOYEE_NUMBER), Some(Some(&FeatureValue::Int(0))));
        assert_eq!(candidate.get(MONTHLY_RATE), Some(Some(&FeatureValue::Float(800.0))));
    }

    #[test]
    fn test_constants_overwrite_existing_values() {
        let mut candidate = CandidateFeatures::new();
        candidate.insert(EMPLOYEE_COUNT, Some(FeatureValue::Int(5)));
        candidate.insert(OVER_18, Some(FeatureValue::from("N")));
        candidate.insert(STANDARD_HOURS, None);

        inject_constants(&mut candidate);
        assert_eq!(candidate.get(EMPLOYEE_COUNT), Some(Some(&FeatureValue::Int(1))));
        assert_eq!(candidate.get(OVER_18), Some(Some(&FeatureValue::from("Y"))));
        assert_eq!(candidate.get(STANDARD_HOURS), Some(Some(&FeatureValue::Int(80))));
        assert_eq!(candidate.get(EMPLOYEE_NUMBER), Some(Some(&FeatureValue::Int(0))));
    }

    #[test]
    fn test_raw_constant_keys_cannot_override() {
        let raw = RawAttributes::new()
            .with("EmployeeCount", 5)
            .with("Over18", "N")
            .with("employee_count", 5)
            .with("over18", "N");

        let candidate = assemble(&raw, &table());
        assert_eq!(candidate.get(EMPLOYEE_COUNT), Some(Some(&FeatureValue::Int(1))));
        assert_eq!(candidate.get(OVER_18), Some(Some(&FeatureValue::from("Y"))));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let raw = RawAttributes::new().with("favourite_colour", "blue");
        let candidate = assemble(&raw, &table());
        // MonthlyRate + 4 constants only
        assert_eq!(candidate.len(), 5);
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let raw = RawAttributes::new().with("age", 41).with("job_role", "Manager");
        assert_eq!(assemble(&raw, &table()), assemble(&raw, &table()));
    }
}
