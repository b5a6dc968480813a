//! Features Module - Feature Assembly Engine
//!
//! Turns raw form attributes into the named features the classifier needs.
//! The field table lives in `layout`; the classifier schema decides order.

pub mod layout;
pub mod value;
pub mod imputation;
pub mod assembler;
pub mod vector;
pub mod presets;


// Re-export common types
pub use assembler::{assemble, CandidateFeatures};
pub use imputation::{estimate_monthly_rate, ImputationTier, MonthlyRateEstimate};
pub use layout::{LayoutInfo, FEATURE_COUNT, FEATURE_VERSION};
pub use value::{FeatureValue, RawAttributes};
pub use vector::{FeatureVector, VectorDecodeError};
