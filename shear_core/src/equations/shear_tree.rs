//! # FRP Shear Strength Model Tree
//!
//! Piecewise-linear regression for the nominal shear strength `Vn` (kN) of
//! concrete members longitudinally reinforced with FRP bars. A decision tree
//! on `b`, `d`, `a/d` and `ρt` picks one of seven linear sub-models; each
//! sub-model is a dot product over the eight operands plus an intercept.
//!
//! ## Notation
//!
//! - `b` = Section width (mm)
//! - `d` = Effective depth (mm)
//! - `a` = Shear span (mm)
//! - `a/d` = Shear span to depth ratio
//! - `f'c` = Concrete compressive strength (MPa)
//! - `ρt` = Longitudinal FRP reinforcement ratio (percent, 2 means 2 %)
//! - `f_f` = FRP ultimate tensile strength (MPa)
//! - `E_f` = FRP modulus of elasticity (GPa)
//!
//! ## Decision Tree
//!
//! ```text
//! b ≤ 229.5 ───────┬─ a/d ≤ 3.25 ────────────────────── LM1
//!                  └─ a/d > 3.25 ────────────────────── LM2
//! 229.5 < b ≤ 435 ─┬─ d ≤ 237.5 ─────────────────────── LM3
//!                  ├─ 237.5 < d ≤ 318 ─┬─ ρt ≤ 1.44 ─── LM4
//!                  │                   └─ ρt > 1.44 ─── LM5
//!                  └─ d > 318 ───────────────────────── LM6
//! b > 435 ───────────────────────────────────────────── LM7
//! ```
//!
//! Every split is inclusive on the lower side. Thresholds and coefficients
//! are empirical constants and must not be edited.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// SPLIT THRESHOLDS
// =============================================================================

/// Narrow-section split on `b` (mm)
pub const WIDTH_SPLIT_MM: f64 = 229.5;
/// Wide-section split on `b` (mm)
pub const WIDE_WIDTH_SPLIT_MM: f64 = 435.0;
/// Slenderness split on `a/d` for narrow sections
pub const SPAN_RATIO_SPLIT: f64 = 3.25;
/// Shallow-section split on `d` (mm)
pub const DEPTH_SPLIT_MM: f64 = 237.5;
/// Deep-section split on `d` (mm)
pub const DEEP_DEPTH_SPLIT_MM: f64 = 318.0;
/// Reinforcement ratio split on `ρt` (percent)
pub const RHO_SPLIT_PERCENT: f64 = 1.44;

// =============================================================================
// OPERANDS
// =============================================================================

/// The eight formula operands in coefficient order.
///
/// `a_over_d` is an independent operand here. Callers that want the ratio
/// tied to `a` and `d` go through [`crate::calculations::shear::ShearInput`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputVector {
    /// Section width b (mm)
    pub b: f64,
    /// Effective depth d (mm)
    pub d: f64,
    /// Shear span a (mm)
    pub a: f64,
    /// Shear span to depth ratio a/d
    pub a_over_d: f64,
    /// Concrete compressive strength f'c (MPa)
    pub fc: f64,
    /// Reinforcement ratio ρt (percent)
    pub rho_t: f64,
    /// FRP tensile strength f_f (MPa)
    pub f_f: f64,
    /// FRP modulus E_f (GPa)
    pub e_f: f64,
}

impl InputVector {
    /// Operands in coefficient order: b, d, a, a/d, f'c, ρt, f_f, E_f
    #[inline]
    pub fn as_array(&self) -> [f64; 8] {
        [
            self.b,
            self.d,
            self.a,
            self.a_over_d,
            self.fc,
            self.rho_t,
            self.f_f,
            self.e_f,
        ]
    }

    /// True when every operand is a finite number
    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }
}

// =============================================================================
// SUB-MODELS
// =============================================================================

/// Coefficients of one linear sub-model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelCoefficients {
    /// Weights for b, d, a, a/d, f'c, ρt, f_f, E_f
    pub weights: [f64; 8],
    /// Constant term (kN)
    pub intercept: f64,
}

impl ModelCoefficients {
    /// `Σ wᵢ·xᵢ + intercept`, accumulated left to right with the intercept last.
    #[inline]
    pub fn apply(&self, x: &InputVector) -> f64 {
        let sum = self
            .weights
            .iter()
            .zip(x.as_array())
            .fold(0.0, |acc, (w, v)| acc + w * v);
        sum + self.intercept
    }
}

const LM1: ModelCoefficients = ModelCoefficients {
    weights: [0.3499, 0.1134, 0.0262, -38.0757, 0.4744, 13.9273, -0.0277, 0.4406],
    intercept: 9.4873,
};

const LM2: ModelCoefficients = ModelCoefficients {
    weights: [0.1043, 0.3369, -0.0609, 7.3607, 0.0262, 12.2679, -0.0043, 0.1629],
    intercept: -59.5343,
};

const LM3: ModelCoefficients = ModelCoefficients {
    weights: [0.098, 0.2522, -0.0303, -2.783, 0.1203, 16.2091, -0.0107, 0.3162],
    intercept: -31.0511,
};

const LM4: ModelCoefficients = ModelCoefficients {
    weights: [0.1552, 0.2537, -0.059, -2.783, 0.0995, 23.5769, -0.0107, 0.3925],
    intercept: -26.8098,
};

const LM5: ModelCoefficients = ModelCoefficients {
    weights: [0.1552, 0.2621, -0.059, -2.783, 0.0731, 24.5878, -0.0107, 0.3925],
    intercept: -27.2859,
};

const LM6: ModelCoefficients = ModelCoefficients {
    weights: [0.376, 0.3502, -0.0995, -2.783, 0.0731, 26.3319, -0.0107, 0.4779],
    intercept: -76.7875,
};

const LM7: ModelCoefficients = ModelCoefficients {
    weights: [0.0907, 0.0731, 0.0425, -4.33, 0.1026, 19.1667, -0.0139, 0.6346],
    intercept: -36.8616,
};

/// One of the seven linear sub-models at the leaves of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShearModel {
    #[serde(rename = "LM1")]
    Lm1,
    #[serde(rename = "LM2")]
    Lm2,
    #[serde(rename = "LM3")]
    Lm3,
    #[serde(rename = "LM4")]
    Lm4,
    #[serde(rename = "LM5")]
    Lm5,
    #[serde(rename = "LM6")]
    Lm6,
    #[serde(rename = "LM7")]
    Lm7,
}

impl ShearModel {
    /// All sub-models in leaf order
    pub const ALL: [ShearModel; 7] = [
        ShearModel::Lm1,
        ShearModel::Lm2,
        ShearModel::Lm3,
        ShearModel::Lm4,
        ShearModel::Lm5,
        ShearModel::Lm6,
        ShearModel::Lm7,
    ];

    /// Coefficient table for this sub-model
    pub fn coefficients(self) -> &'static ModelCoefficients {
        match self {
            ShearModel::Lm1 => &LM1,
            ShearModel::Lm2 => &LM2,
            ShearModel::Lm3 => &LM3,
            ShearModel::Lm4 => &LM4,
            ShearModel::Lm5 => &LM5,
            ShearModel::Lm6 => &LM6,
            ShearModel::Lm7 => &LM7,
        }
    }

    /// Evaluate this sub-model regardless of which leaf the operands fall in
    #[inline]
    pub fn apply(self, x: &InputVector) -> f64 {
        self.coefficients().apply(x)
    }

    /// Short name ("LM1" .. "LM7")
    pub fn name(self) -> &'static str {
        match self {
            ShearModel::Lm1 => "LM1",
            ShearModel::Lm2 => "LM2",
            ShearModel::Lm3 => "LM3",
            ShearModel::Lm4 => "LM4",
            ShearModel::Lm5 => "LM5",
            ShearModel::Lm6 => "LM6",
            ShearModel::Lm7 => "LM7",
        }
    }

    /// Region of the input space routed to this sub-model
    pub fn region(self) -> &'static str {
        match self {
            ShearModel::Lm1 => "b ≤ 229.5, a/d ≤ 3.25",
            ShearModel::Lm2 => "b ≤ 229.5, a/d > 3.25",
            ShearModel::Lm3 => "229.5 < b ≤ 435, d ≤ 237.5",
            ShearModel::Lm4 => "229.5 < b ≤ 435, 237.5 < d ≤ 318, ρt ≤ 1.44",
            ShearModel::Lm5 => "229.5 < b ≤ 435, 237.5 < d ≤ 318, ρt > 1.44",
            ShearModel::Lm6 => "229.5 < b ≤ 435, d > 318",
            ShearModel::Lm7 => "b > 435",
        }
    }
}

impl fmt::Display for ShearModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// EVALUATION
// =============================================================================

/// Walk the decision tree and return the leaf sub-model.
///
/// NaN operands fail every `≤` test and therefore fall to the upper branch.
pub fn select_model(x: &InputVector) -> ShearModel {
    if x.b <= WIDTH_SPLIT_MM {
        if x.a_over_d <= SPAN_RATIO_SPLIT {
            ShearModel::Lm1
        } else {
            ShearModel::Lm2
        }
    } else if x.b <= WIDE_WIDTH_SPLIT_MM {
        if x.d <= DEPTH_SPLIT_MM {
            ShearModel::Lm3
        } else if x.d <= DEEP_DEPTH_SPLIT_MM {
            if x.rho_t <= RHO_SPLIT_PERCENT {
                ShearModel::Lm4
            } else {
                ShearModel::Lm5
            }
        } else {
            ShearModel::Lm6
        }
    } else {
        ShearModel::Lm7
    }
}

/// Select the leaf model and evaluate it.
///
/// # Returns
/// (model, Vn in kN)
#[inline]
pub fn evaluate_vector(x: &InputVector) -> (ShearModel, f64) {
    let model = select_model(x);
    (model, model.apply(x))
}

/// Nominal shear strength Vn (kN).
///
/// Total over all `f64` inputs: no bounds checks, no errors. Out-of-range
/// or non-finite operands produce whatever the selected sub-model yields.
///
/// # Arguments
/// * `b` - Section width (mm)
/// * `d` - Effective depth (mm)
/// * `a` - Shear span (mm)
/// * `a_over_d` - Shear span to depth ratio, taken as given
/// * `fc` - Concrete compressive strength (MPa)
/// * `rho_t` - Reinforcement ratio (percent)
/// * `f_f` - FRP tensile strength (MPa)
/// * `e_f` - FRP modulus (GPa)
///
/// # Example
/// ```rust
/// use shear_core::equations::shear_tree::evaluate;
///
/// let vn = evaluate(150.0, 400.0, 200.0, 0.5, 30.0, 1.5, 1000.0, 70.0);
/// assert!((vn - 131.7994).abs() < 1e-9);
/// ```
#[allow(clippy::too_many_arguments)]
#[inline]
pub fn evaluate(
    b: f64,
    d: f64,
    a: f64,
    a_over_d: f64,
    fc: f64,
    rho_t: f64,
    f_f: f64,
    e_f: f64,
) -> f64 {
    let x = InputVector {
        b,
        d,
        a,
        a_over_d,
        fc,
        rho_t,
        f_f,
        e_f,
    };
    evaluate_vector(&x).1
}
