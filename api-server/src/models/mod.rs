//! Data models

pub mod employee;
pub mod prediction;

pub use employee::*;
pub use prediction::*;
