//! # Shear Strength Equations
//!
//! The empirical model tree for FRP-reinforced concrete shear strength,
//! kept apart from the input handling so the formula can be audited on its
//! own.
//!
//! ## Modules
//!
//! - [`shear_tree`] - Split thresholds, sub-model coefficients, `evaluate`
//! - [`registry`] - Model metadata and Markdown export
//!
//! ## Units
//!
//! - Lengths `b`, `d`, `a` in mm
//! - Stresses `f'c`, `f_f` in MPa, modulus `E_f` in GPa
//! - `ρt` in percent
//! - Output `Vn` in kN

pub mod registry;
pub mod shear_tree;

pub use shear_tree::{
    evaluate,
    evaluate_vector,
    select_model,
    InputVector,
    ModelCoefficients,
    ShearModel,
    DEEP_DEPTH_SPLIT_MM,
    DEPTH_SPLIT_MM,
    RHO_SPLIT_PERCENT,
    SPAN_RATIO_SPLIT,
    WIDE_WIDTH_SPLIT_MM,
    WIDTH_SPLIT_MM,
};

pub use registry::{
    all_models,
    generate_models_markdown,
    ModelMetadata,
    Variable,
    OPERAND_SYMBOLS,
    VARIABLES,
};
