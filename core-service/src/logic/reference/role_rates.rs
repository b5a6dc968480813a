//! Role Rate Table
//!
//! Historical average MonthlyRate per job role, read from a JSON object
//! `{ "Research Director": 1450.0, ... }`. Immutable once loaded.
//!
//! A missing or corrupt file is not fatal: the table comes back empty and
//! remembers why, and imputation falls through to its later tiers.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleRateTable {
    rates: BTreeMap<String, f64>,
    /// Why the table is empty, when loading failed
    #[serde(skip_serializing_if = "Option::is_none")]
    degraded: Option<String>,
}

impl RoleRateTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            rates: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            degraded: None,
        }
    }

    /// Parse a JSON object of role → average. Non-finite values are rejected.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let rates: BTreeMap<String, f64> =
            serde_json::from_str(json).map_err(|e| format!("invalid JSON: {}", e))?;

        if let Some((role, _)) = rates.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("non-finite average for role '{}'", role));
        }

        Ok(Self { rates, degraded: None })
    }

    /// Load from disk, degrading to an empty table on any failure
    pub fn load_or_empty(path: &Path) -> Self {
        let loaded = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| Self::from_json(&content));

        match loaded {
            Ok(table) => {
                log::info!("Loaded {} role rate averages from {}", table.len(), path.display());
                table
            }
            Err(reason) => {
                log::warn!(
                    "Role rate table {} unavailable ({}), MonthlyRate will use fallback values",
                    path.display(),
                    reason
                );
                Self {
                    rates: BTreeMap::new(),
                    degraded: Some(format!("{}: {}", path.display(), reason)),
                }
            }
        }
    }

    pub fn get(&self, role: &str) -> Option<f64> {
        self.rates.get(role).copied()
    }

    /// Arithmetic mean of all averages, None when empty
    pub fn mean(&self) -> Option<f64> {
        if self.rates.is_empty() {
            return None;
        }
        Some(self.rates.values().sum::<f64>() / self.rates.len() as f64)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        self.degraded.as_deref()
    }

    pub fn roles(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
