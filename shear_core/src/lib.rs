//! # shear_core - FRP Shear Strength Engine
//!
//! `shear_core` estimates the nominal shear strength `Vn` of concrete members
//! reinforced with fiber-reinforced-polymer (FRP) bars, using a fixed
//! empirical model tree of seven linear sub-models (LM1-LM7).
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All inputs and results implement Serialize/Deserialize
//! - **Rich Errors**: Malformed input surfaces as a structured error, never as NaN
//!
//! ## Quick Start
//!
//! ```rust
//! use shear_core::equations::evaluate;
//!
//! // b, d, a, a/d, f'c, ρt, f_f, E_f
//! let vn_kn = evaluate(150.0, 400.0, 200.0, 0.5, 30.0, 1.5, 1000.0, 70.0);
//! assert!((vn_kn - 131.80).abs() < 0.01);
//! ```
//!
//! ## Modules
//!
//! - [`equations`] - Model tree, coefficients, and model metadata
//! - [`calculations`] - Validated evaluation, sweeps, batch evaluation
//! - [`units`] - Force units for the result
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod equations;
pub mod errors;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, sweep, InputField, RangePolicy, ShearInput, ShearResult, SweepSpec};
pub use equations::{evaluate, InputVector, ShearModel};
pub use errors::{CalcError, CalcResult};
pub use units::ForceUnit;
