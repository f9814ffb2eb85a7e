//! Wire models for the Agricultural Yield Prediction Service
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
