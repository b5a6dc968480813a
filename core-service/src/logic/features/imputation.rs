//! MonthlyRate Imputation
//!
//! MonthlyRate is not collected from the form. It is estimated from the
//! historical per-role averages with a three-tier fallback:
//!
//! 1. average for the employee's job role
//! 2. mean of every role average in the table
//! 3. fixed default (empty table)

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MONTHLY_RATE;
use crate::logic::reference::RoleRateTable;

/// Which fallback tier produced the estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationTier {
    RoleAverage,
    GlobalAverage,
    FixedDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRateEstimate {
    pub value: f64,
    pub tier: ImputationTier,
}

/// Tier 1: the role's own average
pub fn role_average(job_role: Option<&str>, table: &RoleRateTable) -> Option<f64> {
    job_role.and_then(|role| table.get(role))
}

/// Tier 2: mean of all averages (None when the table is empty)
pub fn global_average(table: &RoleRateTable) -> Option<f64> {
    table.mean()
}

/// Estimate MonthlyRate for a job role. Always yields a value.
pub fn estimate_monthly_rate(job_role: Option<&str>, table: &RoleRateTable) -> MonthlyRateEstimate {
    if let Some(value) = role_average(job_role, table) {
        return MonthlyRateEstimate { value, tier: ImputationTier::RoleAverage };
    }

    if let Some(value) = global_average(table) {
        log::debug!(
            "No MonthlyRate average for role {:?}, using mean of {} roles",
            job_role,
            table.len()
        );
        return MonthlyRateEstimate { value, tier: ImputationTier::GlobalAverage };
    }

    log::debug!("Role rate table empty, using default MonthlyRate {}", DEFAULT_MONTHLY_RATE);
    MonthlyRateEstimate {
        value: DEFAULT_MONTHLY_RATE,
        tier: ImputationTier::FixedDefault,
    }
}
