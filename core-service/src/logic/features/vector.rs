//! Feature Vector - Core data structure for ML input
//!
//! **Versioned, ordered feature vector**
//!
//! Field names and order always equal the classifier's declared schema.
//! Values are never null: the orchestrator only builds a vector after the
//! completeness check passed. A vector read back from JSON (a logged
//! request, say) is checked against this build's layout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::layout::{compute_layout_hash, FEATURE_VERSION};
use super::value::FeatureValue;

/// Rejected while decoding a serialized vector
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VectorDecodeError {
    #[error("{names} feature names but {values} values")]
    LengthMismatch { names: usize, values: usize },

    #[error(
        "feature layout mismatch: expected v{} ({:08x}), got v{} ({:08x})",
        FEATURE_VERSION,
        compute_layout_hash(),
        .version,
        .hash
    )]
    LayoutMismatch { version: u8, hash: u32 },
}

/// Wire shape of `FeatureVector`, validated before use
#[derive(Deserialize)]
struct VectorRecord {
    version: u8,
    layout_hash: u32,
    names: Vec<String>,
    values: Vec<FeatureValue>,
}

impl TryFrom<VectorRecord> for FeatureVector {
    type Error = VectorDecodeError;

    fn try_from(record: VectorRecord) -> Result<Self, Self::Error> {
        if record.names.len() != record.values.len() {
            return Err(VectorDecodeError::LengthMismatch {
                names: record.names.len(),
                values: record.values.len(),
            });
        }
        if record.version != FEATURE_VERSION || record.layout_hash != compute_layout_hash() {
            return Err(VectorDecodeError::LayoutMismatch {
                version: record.version,
                hash: record.layout_hash,
            });
        }

        Ok(Self {
            version: record.version,
            layout_hash: record.layout_hash,
            names: record.names,
            values: record.values,
        })
    }
}

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VectorRecord")]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    names: Vec<String>,
    values: Vec<FeatureValue>,
}

impl FeatureVector {
    /// Build from ordered (name, value) pairs
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, FeatureValue)>,
        S: Into<String>,
    {
        let (names, values): (Vec<String>, Vec<FeatureValue>) = pairs
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .unzip();

        Self {
            version: FEATURE_VERSION,
            layout_hash: compute_layout_hash(),
            names,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Field names in schema order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Values in schema order
    pub fn values(&self) -> &[FeatureValue] {
        &self.values
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<&FeatureValue> {
        self.values.get(index)
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<&FeatureValue> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.values.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.names.iter().map(String::as_str).zip(self.values.iter())
    }

    /// True when names match `schema` exactly, in order
    pub fn matches_schema<S: AsRef<str>>(&self, schema: &[S]) -> bool {
        self.names.len() == schema.len()
            && self.names.iter().zip(schema).all(|(a, b)| a == b.as_ref())
    }

    /// Convert to JSON-serializable format for logging / display
    pub fn to_log_entry(&self) -> serde_json::Value {
        let named: serde_json::Map<String, serde_json::Value> = self
            .iter()
            .map(|(name, value)| {
                (name.to_string(), serde_json::to_value(value).unwrap_or(serde_json::Value::Null))
            })
            .collect();

        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "feature_count": self.len(),
            "named_values": named,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
