//! # Shear Capacity Calculation
//!
//! Caller-side wrapper around the model tree: a serializable input record,
//! validation of malformed values, nominal validity range checks, and a
//! result record carrying the selected sub-model.
//!
//! ## Span-to-depth ratio
//!
//! `ShearInput` has no independent a/d field. The ratio is always derived as
//! `shear_span_mm / depth_mm`, so a, d and a/d can never disagree.
//!
//! ## Example
//!
//! ```rust
//! use shear_core::calculations::shear::{calculate, ShearInput};
//! use shear_core::equations::ShearModel;
//! use shear_core::units::ForceUnit;
//!
//! let input = ShearInput {
//!     label: "Slab strip S-1".to_string(),
//!     width_mm: 150.0,
//!     depth_mm: 400.0,
//!     shear_span_mm: 200.0,
//!     fc_mpa: 30.0,
//!     rho_percent: 1.5,
//!     ff_mpa: 1000.0,
//!     ef_gpa: 70.0,
//! };
//!
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.model, ShearModel::Lm1);
//! assert!((result.vn(ForceUnit::Kilonewtons) - 131.80).abs() < 0.01);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::equations::shear_tree::{evaluate_vector, InputVector, ShearModel};
use crate::errors::{CalcError, CalcResult};
use crate::units::{ForceUnit, Kilonewtons};

// ============================================================================
// Input fields
// ============================================================================

/// One of the eight formula inputs.
///
/// Serialized by its `ShearInput` field name; parsed from either that name
/// or the symbol shown on the input form (`b`, `a/d`, `f'_c`, `ρ_t`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputField {
    /// Section width b (mm)
    #[serde(rename = "width_mm")]
    Width,
    /// Effective depth d (mm)
    #[serde(rename = "depth_mm")]
    Depth,
    /// Shear span a (mm)
    #[serde(rename = "shear_span_mm")]
    ShearSpan,
    /// Shear span to depth ratio a/d
    #[serde(rename = "a_over_d")]
    SpanDepthRatio,
    /// Concrete compressive strength f'c (MPa)
    #[serde(rename = "fc_mpa")]
    ConcreteStrength,
    /// Reinforcement ratio ρt (percent)
    #[serde(rename = "rho_percent")]
    ReinforcementRatio,
    /// FRP tensile strength f_f (MPa)
    #[serde(rename = "ff_mpa")]
    FrpStrength,
    /// FRP modulus E_f (GPa)
    #[serde(rename = "ef_gpa")]
    FrpModulus,
}

/// Closed interval the regression was fitted over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NominalRange {
    pub min: f64,
    pub max: f64,
}

impl NominalRange {
    pub const fn new(min: f64, max: f64) -> Self {
        NominalRange { min, max }
    }

    /// Inclusive containment
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl InputField {
    /// All fields in coefficient order
    pub const ALL: [InputField; 8] = [
        InputField::Width,
        InputField::Depth,
        InputField::ShearSpan,
        InputField::SpanDepthRatio,
        InputField::ConcreteStrength,
        InputField::ReinforcementRatio,
        InputField::FrpStrength,
        InputField::FrpModulus,
    ];

    /// Field name as it appears in JSON input
    pub fn field_name(self) -> &'static str {
        match self {
            InputField::Width => "width_mm",
            InputField::Depth => "depth_mm",
            InputField::ShearSpan => "shear_span_mm",
            InputField::SpanDepthRatio => "a_over_d",
            InputField::ConcreteStrength => "fc_mpa",
            InputField::ReinforcementRatio => "rho_percent",
            InputField::FrpStrength => "ff_mpa",
            InputField::FrpModulus => "ef_gpa",
        }
    }

    /// Engineering symbol
    pub fn symbol(self) -> &'static str {
        match self {
            InputField::Width => "b",
            InputField::Depth => "d",
            InputField::ShearSpan => "a",
            InputField::SpanDepthRatio => "a/d",
            InputField::ConcreteStrength => "f'c",
            InputField::ReinforcementRatio => "ρt",
            InputField::FrpStrength => "f_f",
            InputField::FrpModulus => "E_f",
        }
    }

    /// Unit of the field ("" for a/d)
    pub fn unit(self) -> &'static str {
        match self {
            InputField::Width | InputField::Depth | InputField::ShearSpan => "mm",
            InputField::SpanDepthRatio => "",
            InputField::ConcreteStrength | InputField::FrpStrength => "MPa",
            InputField::ReinforcementRatio => "%",
            InputField::FrpModulus => "GPa",
        }
    }

    /// Range of the test database behind the regression
    pub fn nominal_range(self) -> NominalRange {
        match self {
            InputField::Width => NominalRange::new(89.0, 1200.0),
            InputField::Depth => NominalRange::new(73.0, 889.0),
            InputField::ShearSpan => NominalRange::new(180.0, 3050.0),
            InputField::SpanDepthRatio => NominalRange::new(2.47, 3.43),
            InputField::ConcreteStrength => NominalRange::new(19.2, 93.0),
            InputField::ReinforcementRatio => NominalRange::new(0.11, 4.12),
            InputField::FrpStrength => NominalRange::new(397.0, 2840.0),
            InputField::FrpModulus => NominalRange::new(24.8, 192.0),
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for InputField {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        let field = match key {
            "b" | "width" | "width_mm" => InputField::Width,
            "d" | "depth" | "depth_mm" => InputField::Depth,
            "a" | "shear_span" | "shear_span_mm" => InputField::ShearSpan,
            "a/d" | "a_d" | "ad" | "a_over_d" => InputField::SpanDepthRatio,
            "f'c" | "f'_c" | "fc" | "f_c" | "fc_mpa" => InputField::ConcreteStrength,
            "ρt" | "ρ_t" | "rho" | "rho_t" | "roh_t" | "rho_percent" => InputField::ReinforcementRatio,
            "f_f" | "ff" | "ff_mpa" => InputField::FrpStrength,
            "E_f" | "e_f" | "ef" | "Ef" | "ef_gpa" => InputField::FrpModulus,
            _ => return Err(CalcError::unknown_variable(key)),
        };
        Ok(field)
    }
}

// ============================================================================
// Input
// ============================================================================

/// Input parameters for one shear capacity evaluation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "B-3",
///   "width_mm": 300.0,
///   "depth_mm": 300.0,
///   "shear_span_mm": 900.0,
///   "fc_mpa": 40.0,
///   "rho_percent": 1.0,
///   "ff_mpa": 900.0,
///   "ef_gpa": 60.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShearInput {
    /// User label (e.g., "B-1", "Slab strip S-2")
    #[serde(default)]
    pub label: String,

    /// Section width b (mm)
    pub width_mm: f64,

    /// Effective depth d (mm)
    pub depth_mm: f64,

    /// Shear span a (mm)
    pub shear_span_mm: f64,

    /// Concrete compressive strength f'c (MPa)
    pub fc_mpa: f64,

    /// FRP reinforcement ratio ρt in percent (2.0 means 2 %)
    pub rho_percent: f64,

    /// FRP ultimate tensile strength f_f (MPa)
    pub ff_mpa: f64,

    /// FRP modulus of elasticity E_f (GPa)
    pub ef_gpa: f64,
}

impl ShearInput {
    /// Derived shear span to depth ratio a/d
    pub fn a_over_d(&self) -> f64 {
        self.shear_span_mm / self.depth_mm
    }

    /// Formula operands, with a/d derived from a and d
    pub fn to_vector(&self) -> InputVector {
        InputVector {
            b: self.width_mm,
            d: self.depth_mm,
            a: self.shear_span_mm,
            a_over_d: self.a_over_d(),
            fc: self.fc_mpa,
            rho_t: self.rho_percent,
            f_f: self.ff_mpa,
            e_f: self.ef_gpa,
        }
    }

    /// Current value of a field (a/d is derived)
    pub fn value(&self, field: InputField) -> f64 {
        match field {
            InputField::Width => self.width_mm,
            InputField::Depth => self.depth_mm,
            InputField::ShearSpan => self.shear_span_mm,
            InputField::SpanDepthRatio => self.a_over_d(),
            InputField::ConcreteStrength => self.fc_mpa,
            InputField::ReinforcementRatio => self.rho_percent,
            InputField::FrpStrength => self.ff_mpa,
            InputField::FrpModulus => self.ef_gpa,
        }
    }

    /// Copy of this input with one field replaced.
    ///
    /// Setting a/d moves the shear span (`a = ratio × d`) and keeps d.
    pub fn with_value(&self, field: InputField, value: f64) -> Self {
        let mut next = self.clone();
        match field {
            InputField::Width => next.width_mm = value,
            InputField::Depth => next.depth_mm = value,
            InputField::ShearSpan => next.shear_span_mm = value,
            InputField::SpanDepthRatio => next.shear_span_mm = value * self.depth_mm,
            InputField::ConcreteStrength => next.fc_mpa = value,
            InputField::ReinforcementRatio => next.rho_percent = value,
            InputField::FrpStrength => next.ff_mpa = value,
            InputField::FrpModulus => next.ef_gpa = value,
        }
        next
    }

    /// Validate input parameters.
    ///
    /// Every supplied value must be finite and strictly positive.
    pub fn validate(&self) -> CalcResult<()> {
        for field in InputField::ALL {
            if field == InputField::SpanDepthRatio {
                continue;
            }
            let value = self.value(field);
            if !value.is_finite() {
                return Err(CalcError::invalid_input(
                    field.field_name(),
                    value.to_string(),
                    "Value must be a finite number",
                ));
            }
            if value <= 0.0 {
                return Err(CalcError::invalid_input(
                    field.field_name(),
                    value.to_string(),
                    format!("{} must be positive", field.symbol()),
                ));
            }
        }

        let ratio = self.a_over_d();
        if !ratio.is_finite() {
            return Err(CalcError::invalid_input(
                InputField::SpanDepthRatio.field_name(),
                ratio.to_string(),
                "a/d overflows for the given shear span and depth",
            ));
        }
        Ok(())
    }

    /// Fields outside the nominal validity ranges, in coefficient order.
    pub fn range_warnings(&self) -> Vec<RangeWarning> {
        InputField::ALL
            .iter()
            .filter_map(|&field| {
                let value = self.value(field);
                let range = field.nominal_range();
                if range.contains(value) {
                    None
                } else {
                    Some(RangeWarning {
                        field,
                        value,
                        min: range.min,
                        max: range.max,
                    })
                }
            })
            .collect()
    }
}

/// An input outside the range the regression was fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeWarning {
    pub field: InputField,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl RangeWarning {
    /// Human-readable message
    pub fn message(&self) -> String {
        let unit = self.field.unit();
        let sep = if unit.is_empty() { "" } else { " " };
        format!(
            "{} = {}{}{} is outside the calibrated range [{}, {}]{}{}",
            self.field.symbol(),
            self.value,
            sep,
            unit,
            self.min,
            self.max,
            sep,
            unit
        )
    }
}

impl From<RangeWarning> for CalcError {
    fn from(w: RangeWarning) -> Self {
        CalcError::out_of_range(w.field.field_name(), w.value, w.min, w.max)
    }
}

/// What to do with inputs outside the nominal ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Skip the range check entirely
    Ignore,
    /// Evaluate and report warnings alongside the result
    #[default]
    Warn,
    /// Refuse to evaluate out-of-range inputs
    Reject,
}

impl FromStr for RangePolicy {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(RangePolicy::Ignore),
            "warn" => Ok(RangePolicy::Warn),
            "reject" => Ok(RangePolicy::Reject),
            _ => Err(CalcError::invalid_input(
                "range_policy",
                s,
                "Expected 'ignore', 'warn' or 'reject'",
            )),
        }
    }
}

// ============================================================================
// Result
// ============================================================================

/// Results from a shear capacity evaluation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "B-3",
///   "model": "LM4",
///   "vn_kn": 75.8881,
///   "a_over_d": 3.0,
///   "range_warnings": []
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShearResult {
    /// Label copied from the input
    #[serde(default)]
    pub label: String,

    /// Sub-model selected by the tree
    pub model: ShearModel,

    /// Nominal shear strength Vn (kN)
    pub vn_kn: f64,

    /// Derived a/d used for evaluation
    pub a_over_d: f64,

    /// Inputs outside the calibrated ranges (empty under `RangePolicy::Ignore`)
    #[serde(default)]
    pub range_warnings: Vec<RangeWarning>,
}

impl ShearResult {
    /// Vn expressed in the requested unit
    pub fn vn(&self, unit: ForceUnit) -> f64 {
        unit.from_kn(Kilonewtons(self.vn_kn))
    }

    /// True when every input lay inside the calibrated ranges
    pub fn within_calibration(&self) -> bool {
        self.range_warnings.is_empty()
    }
}

/// Calculate Vn, reporting out-of-range inputs as warnings.
///
/// # Returns
///
/// * `Ok(ShearResult)` - Selected model and Vn
/// * `Err(CalcError::InvalidInput)` - Non-finite or non-positive input
pub fn calculate(input: &ShearInput) -> CalcResult<ShearResult> {
    calculate_with_policy(input, RangePolicy::Warn)
}

/// Calculate Vn under an explicit range policy.
pub fn calculate_with_policy(input: &ShearInput, policy: RangePolicy) -> CalcResult<ShearResult> {
    input.validate()?;

    let range_warnings = match policy {
        RangePolicy::Ignore => Vec::new(),
        RangePolicy::Warn => input.range_warnings(),
        RangePolicy::Reject => {
            if let Some(first) = input.range_warnings().into_iter().next() {
                return Err(first.into());
            }
            Vec::new()
        }
    };
    for w in &range_warnings {
        info!(label = %input.label, field = w.field.field_name(), value = w.value, "{}", w.message());
    }

    let vector = input.to_vector();
    let (model, vn_kn) = evaluate_vector(&vector);
    debug!(label = %input.label, model = %model, vn_kn, a_over_d = vector.a_over_d, "shear capacity evaluated");

    Ok(ShearResult {
        label: input.label.clone(),
        model,
        vn_kn,
        a_over_d: vector.a_over_d,
        range_warnings,
    })
}
