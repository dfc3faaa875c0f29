//! # composite_core - Composite Load Sharing Engine
//!
//! `composite_core` splits an applied load between the matrix and the
//! reinforcement of a two-phase composite by the rule of mixtures. All inputs
//! and outputs are JSON-serializable, making it easy to drive from a CLI,
//! a GUI, or an AI assistant.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take a request and return a response
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Injected Data**: The calculator reads materials through a repository trait
//!
//! ## Quick Start
//!
//! ```rust
//! use composite_core::calculations::{calculate, CalculationRequest};
//! use composite_core::materials::{MaterialCatalog, MaterialRepository};
//! use composite_core::units::{AreaUnit, LoadUnit, ModulusUnit};
//!
//! let catalog = MaterialCatalog::builtin();
//! let (matrix, reinforcement) = catalog.resolve_pair("Epóxi", "Fibra de Carbono HS").unwrap();
//!
//! let request = CalculationRequest {
//!     material_matrix: matrix,
//!     material_reinforcement: reinforcement,
//!     modulus_unit: ModulusUnit::GPa,
//!     vol_fraction_matrix: 0.4,
//!     vol_fraction_reinforcement: 0.6,
//!     stress_value: 1000.0,
//!     stress_unit: LoadUnit::Newton,
//!     area_value: 1.0,
//!     area_unit: AreaUnit::SquareMeter,
//! };
//!
//! let response = calculate(&request).unwrap();
//! assert!(response.result.reinforcement_force > response.result.matrix_force);
//!
//! let json = serde_json::to_string_pretty(&response).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Force sharing calculation
//! - [`materials`] - Material definitions and the catalog repository
//! - [`units`] - Unit families and conversions
//! - [`config`] - Front-end defaults and catalog selection
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod config;
pub mod errors;
pub mod materials;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, CalculationRequest, CalculationResponse, ForceResult};
pub use config::Settings;
pub use errors::{CalcError, CalcResult};
pub use materials::{Material, MaterialCatalog, MaterialCategory, MaterialRepository};
pub use units::{AreaUnit, LoadUnit, ModulusUnit, UnitTag};
