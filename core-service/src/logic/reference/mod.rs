//! Reference Module - read-only artifacts (classifier, role rate table)

pub mod role_rates;
pub mod provider;

pub use provider::{ArtifactPaths, ReferenceData, ReferenceProvider};
pub use role_rates::RoleRateTable;
