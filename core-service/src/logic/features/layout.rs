//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! Declares every field the assembler can produce, the form input key it
//! is collected under (if any) and where its value comes from. The
//! classifier's own schema decides the final order; this table decides
//! which names exist.
//!
//! ## Rules (NEVER break these):
//! 1. Add field → increment FEATURE_VERSION
//! 2. Rename field or input key → increment FEATURE_VERSION
//! 3. Remove field → increment FEATURE_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::logic::error::PipelineError;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FIELD SPEC
// ============================================================================

/// Where a field's value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    /// Copied from the form under `input_key`
    Collected,
    /// Computed by the assembler (imputed)
    Derived,
    /// Fixed organization constant injected at assembly time
    Constant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Name the classifier was trained with
    pub canonical: &'static str,
    /// Form input key (empty for derived/constant fields)
    pub input_key: &'static str,
    pub source: FieldSource,
}

const fn collected(canonical: &'static str, input_key: &'static str) -> FieldSpec {
    FieldSpec { canonical, input_key, source: FieldSource::Collected }
}

const fn derived(canonical: &'static str) -> FieldSpec {
    FieldSpec { canonical, input_key: "", source: FieldSource::Derived }
}

const fn constant(canonical: &'static str) -> FieldSpec {
    FieldSpec { canonical, input_key: "", source: FieldSource::Constant }
}

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Every field the assembler knows about.
/// This is the SINGLE SOURCE OF TRUTH for the input key ↔ feature name mapping.
pub const FIELD_LAYOUT: &[FieldSpec] = &[
    // === Personal (0-3) ===
    collected("Age", "age"),
    collected("Gender", "gender"),
    collected("MaritalStatus", "marital_status"),
    collected("DistanceFromHome", "distance_from_home"),

    // === Education (4-5) ===
    collected("Education", "education"),
    collected("EducationField", "education_field"),

    // === Job (6-10) ===
    collected("Department", "department"),
    collected("JobRole", "job_role"),
    collected("JobLevel", "job_level"),
    collected("OverTime", "overtime"),
    collected("BusinessTravel", "business_travel"),

    // === Compensation (11-15) ===
    collected("MonthlyIncome", "monthly_income"),
    collected("DailyRate", "daily_rate"),
    collected("HourlyRate", "hourly_rate"),
    collected("PercentSalaryHike", "percent_salary_hike"),
    collected("StockOptionLevel", "stock_option_level"),

    // === Career history (16-22) ===
    collected("NumCompaniesWorked", "num_companies_worked"),
    collected("TotalWorkingYears", "total_working_years"),
    collected("YearsAtCompany", "years_at_company"),
    collected("YearsInCurrentRole", "years_in_current_role"),
    collected("YearsSinceLastPromotion", "years_since_last_promotion"),
    collected("YearsWithCurrManager", "years_with_curr_manager"),
    collected("TrainingTimesLastYear", "training_times_last_year"),

    // === Satisfaction & rating (23-28) ===
    collected("EnvironmentSatisfaction", "environment_satisfaction"),
    collected("JobSatisfaction", "job_satisfaction"),
    collected("RelationshipSatisfaction", "relationship_satisfaction"),
    collected("WorkLifeBalance", "work_life_balance"),
    collected("JobInvolvement", "job_involvement"),
    collected("PerformanceRating", "performance_rating"),

    // === Derived (29) ===
    derived(MONTHLY_RATE),

    // === Organization constants (30-33) ===
    constant(EMPLOYEE_COUNT),
    constant(OVER_18),
    constant(STANDARD_HOURS),
    constant(EMPLOYEE_NUMBER),
];

/// Total number of declared fields
/// IMPORTANT: Must match FIELD_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 34;

/// Number of fields collected from the form
pub const COLLECTED_COUNT: usize = 29;

pub const MONTHLY_RATE: &str = "MonthlyRate";
pub const EMPLOYEE_COUNT: &str = "EmployeeCount";
pub const OVER_18: &str = "Over18";
pub const STANDARD_HOURS: &str = "StandardHours";
pub const EMPLOYEE_NUMBER: &str = "EmployeeNumber";

/// Input key holding the job role used for MonthlyRate imputation
pub const JOB_ROLE_KEY: &str = "job_role";

// ============================================================================
// CATEGORICAL DOMAINS (enforced by the form collaborator, not the core)
// ============================================================================

pub const GENDERS: &[&str] = &["Male", "Female"];
pub const MARITAL_STATUSES: &[&str] = &["Single", "Married", "Divorced"];
pub const EDUCATION_FIELDS: &[&str] = &[
    "Life Sciences",
    "Medical",
    "Marketing",
    "Technical Degree",
    "Human Resources",
    "Other",
];
pub const DEPARTMENTS: &[&str] = &["Sales", "Research & Development", "Human Resources"];
pub const JOB_ROLES: &[&str] = &[
    "Sales Executive",
    "Research Scientist",
    "Laboratory Technician",
    "Manufacturing Director",
    "Healthcare Representative",
    "Manager",
    "Sales Representative",
    "Research Director",
    "Human Resources",
];
pub const OVERTIME_FLAGS: &[&str] = &["Yes", "No"];
pub const TRAVEL_FREQUENCIES: &[&str] = &["Travel Rarely", "Travel Frequently", "Non-Travel"];

/// Allowed values for a categorical input key, if it has a fixed domain
pub fn choices_for(input_key: &str) -> Option<&'static [&'static str]> {
    match input_key {
        "gender" => Some(GENDERS),
        "marital_status" => Some(MARITAL_STATUSES),
        "education_field" => Some(EDUCATION_FIELDS),
        "department" => Some(DEPARTMENTS),
        "job_role" => Some(JOB_ROLES),
        "overtime" => Some(OVERTIME_FLAGS),
        "business_travel" => Some(TRAVEL_FREQUENCIES),
        _ => None,
    }
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the field layout
/// Stamped on every vector and checked when one is read back from JSON
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for spec in FIELD_LAYOUT {
        hasher.update(spec.canonical.as_bytes());
        hasher.update(&[0]);
        hasher.update(spec.input_key.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: compute_layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FIELD_LAYOUT.iter().map(|s| s.canonical.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// SCHEMA CONTRACT
// ============================================================================

/// Startup contract check: every field the classifier declares must be
/// producible by this layout. Runs once before serving any request.
pub fn validate_schema_contract<S: AsRef<str>>(schema: &[S]) -> Result<(), PipelineError> {
    let unknown: Vec<String> = schema
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| field_spec(name).is_none())
        .map(str::to_string)
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::SchemaContract { unknown })
    }
}

// ============================================================================
// FIELD LOOKUP
// ============================================================================

/// Get field spec by canonical name (O(n) but fields are few)
pub fn field_spec(canonical: &str) -> Option<&'static FieldSpec> {
    FIELD_LAYOUT.iter().find(|spec| spec.canonical == canonical)
}

/// Form input key → canonical feature name
pub fn canonical_for_input(input_key: &str) -> Option<&'static str> {
    collected_fields()
        .find(|spec| spec.input_key == input_key)
        .map(|spec| spec.canonical)
}

/// Canonical feature name → form input key
pub fn input_for_canonical(canonical: &str) -> Option<&'static str> {
    field_spec(canonical)
        .filter(|spec| spec.source == FieldSource::Collected)
        .map(|spec| spec.input_key)
}

/// Fields copied from the form
pub fn collected_fields() -> impl Iterator<Item = &'static FieldSpec> {
    FIELD_LAYOUT.iter().filter(|spec| spec.source == FieldSource::Collected)
}

// ============================================================================
// TESTS
// ============================================================================
