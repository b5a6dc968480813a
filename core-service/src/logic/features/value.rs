//! Feature Values & Raw Attributes
//!
//! Values arrive as loosely typed JSON from the form collaborator.
//! `null` means "not filled in yet" and is kept as `None`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single attribute value: integer, decimal or categorical string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl FeatureValue {
    /// Numeric view (None for categorical strings)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Int(v) => Some(*v as f64),
            FeatureValue::Float(v) => Some(*v),
            FeatureValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Key used to look the value up in categorical encodings.
    /// Integral floats collapse to their integer form so `3.0` and `3` match.
    pub fn category_key(&self) -> String {
        match self {
            FeatureValue::Float(v) if v.fract() == 0.0 && v.is_finite() => {
                format!("{}", *v as i64)
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Int(v) => write!(f, "{}", v),
            FeatureValue::Float(v) => write!(f, "{}", v),
            FeatureValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        FeatureValue::Int(v)
    }
}

impl From<i32> for FeatureValue {
    fn from(v: i32) -> Self {
        FeatureValue::Int(i64::from(v))
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Float(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        FeatureValue::Text(v.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(v: String) -> Self {
        FeatureValue::Text(v)
    }
}

// ============================================================================
// RAW ATTRIBUTES
// ============================================================================

/// Collected attributes keyed by form input key (`"age"`, `"job_role"`, ...)
///
/// A key may be absent (never collected) or present with `None`
/// (collected field left empty). The two cases are reported differently
/// by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawAttributes {
    values: BTreeMap<String, Option<FeatureValue>>,
}

impl RawAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set a value (builder style)
    pub fn with(mut self, key: &str, value: impl Into<FeatureValue>) -> Self {
        self.insert(key, Some(value.into()));
        self
    }

    /// Mark a key as collected but empty (builder style)
    pub fn with_null(mut self, key: &str) -> Self {
        self.insert(key, None);
        self
    }

    pub fn insert(&mut self, key: &str, value: Option<FeatureValue>) {
        self.values.insert(key.to_string(), value);
    }

    /// Drop a key entirely
    pub fn remove(&mut self, key: &str) -> Option<Option<FeatureValue>> {
        self.values.remove(key)
    }

    /// `None` if absent, `Some(None)` if present but null
    pub fn get(&self, key: &str) -> Option<Option<&FeatureValue>> {
        self.values.get(key).map(|v| v.as_ref())
    }

    /// Present and non-null value
    pub fn value(&self, key: &str) -> Option<&FeatureValue> {
        self.values.get(key).and_then(|v| v.as_ref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&FeatureValue>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
