//! # Composite Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Request` - Input parameters (JSON-serializable)
//! - `*Response` - Calculation results (JSON-serializable)
//! - `calculate(request) -> Result<*Response, CalcError>` - Pure calculation function
//!
//! Nothing is retained between calls; front ends own any result history.
//!
//! ## Available Calculations
//!
//! - [`force_sharing`] - Rule-of-mixtures load split between matrix and reinforcement

pub mod force_sharing;

// Re-export commonly used types
pub use force_sharing::{
    calculate, compute_forces, compute_normalized, CalculationRequest, CalculationResponse, Composition,
    ForceResult, NormalizedInputs,
};
