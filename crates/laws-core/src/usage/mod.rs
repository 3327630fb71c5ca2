//! Token usage accounting.

pub mod meter;

pub use meter::UsageMeter;
