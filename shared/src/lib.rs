//! Shared types and models for the Agricultural Yield Prediction Service
//!
//! This crate contains the wire models and input validation rules shared
//! between the backend and other components of the system.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
