//! # Sensitivity Sweep
//!
//! Evaluates Vn over evenly spaced values of one input while the other
//! inputs stay at their base values. The output is plain data (value, Vn,
//! selected model) for the caller to tabulate or plot.
//!
//! ## Example
//!
//! ```rust
//! use shear_core::calculations::shear::{InputField, ShearInput};
//! use shear_core::calculations::sweep::{sweep, SweepSpec};
//!
//! let base = ShearInput {
//!     label: "B-1".to_string(),
//!     width_mm: 300.0,
//!     depth_mm: 300.0,
//!     shear_span_mm: 900.0,
//!     fc_mpa: 40.0,
//!     rho_percent: 1.0,
//!     ff_mpa: 900.0,
//!     ef_gpa: 60.0,
//! };
//!
//! let spec = SweepSpec::new(InputField::ReinforcementRatio, 0.5, 2.5).with_points(21);
//! let result = sweep(&base, &spec).unwrap();
//! assert_eq!(result.points.len(), 21);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::equations::shear_tree::{evaluate_vector, ShearModel};
use crate::errors::{CalcError, CalcResult};
use crate::units::ForceUnit;

use super::shear::{InputField, ShearInput};

/// Default number of sample points
pub const DEFAULT_SWEEP_POINTS: usize = 100;

/// Upper bound on sample points for a single sweep
pub const MAX_SWEEP_POINTS: usize = 100_000;

impl InputField {
    /// Default sweep interval for this field.
    ///
    /// Plot ranges of the calculator form; a/d uses its calibrated range instead.
    pub fn default_sweep_range(self) -> (f64, f64) {
        match self {
            InputField::Width | InputField::Depth | InputField::ShearSpan => (100.0, 500.0),
            InputField::SpanDepthRatio => {
                let range = self.nominal_range();
                (range.min, range.max)
            }
            InputField::ConcreteStrength => (5.0, 100.0),
            InputField::ReinforcementRatio => (0.1, 2.0),
            InputField::FrpStrength => (100.0, 600.0),
            InputField::FrpModulus => (10.0, 200.0),
        }
    }
}

/// Which input to vary, over what interval, at how many points.
///
/// ## JSON Example
///
/// ```json
/// { "variable": "fc_mpa", "start": 5.0, "end": 100.0, "points": 100 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepSpec {
    /// Input being varied
    pub variable: InputField,
    /// First sample value
    pub start: f64,
    /// Last sample value (inclusive)
    pub end: f64,
    /// Number of samples, at least 2
    #[serde(default = "default_points")]
    pub points: usize,
}

fn default_points() -> usize {
    DEFAULT_SWEEP_POINTS
}

impl SweepSpec {
    /// Sweep `variable` from `start` to `end` at the default point count
    pub fn new(variable: InputField, start: f64, end: f64) -> Self {
        SweepSpec {
            variable,
            start,
            end,
            points: DEFAULT_SWEEP_POINTS,
        }
    }

    /// Sweep over the field's default interval
    pub fn default_for(variable: InputField) -> Self {
        let (start, end) = variable.default_sweep_range();
        SweepSpec::new(variable, start, end)
    }

    /// Set the number of sample points
    pub fn with_points(mut self, points: usize) -> Self {
        self.points = points;
        self
    }

    /// Validate the specification.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.start.is_finite() {
            return Err(CalcError::invalid_input(
                "start",
                self.start.to_string(),
                "Sweep start must be finite",
            ));
        }
        if !self.end.is_finite() {
            return Err(CalcError::invalid_input(
                "end",
                self.end.to_string(),
                "Sweep end must be finite",
            ));
        }
        if self.points < 2 || self.points > MAX_SWEEP_POINTS {
            return Err(CalcError::invalid_input(
                "points",
                self.points.to_string(),
                format!("Point count must be between 2 and {}", MAX_SWEEP_POINTS),
            ));
        }
        Ok(())
    }

    /// Evenly spaced sample values, endpoints included.
    ///
    /// Yields no values for zero points and only `start` for one point.
    pub fn values(&self) -> Vec<f64> {
        match self.points {
            0 => return Vec::new(),
            1 => return vec![self.start],
            _ => {}
        }
        let last = (self.points - 1) as f64;
        (0..self.points)
            .map(|i| {
                if i + 1 == self.points {
                    self.end
                } else {
                    self.start + (self.end - self.start) * i as f64 / last
                }
            })
            .collect()
    }
}

/// One sample of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Value of the swept input as evaluated (for a/d, the derived `a / d`)
    pub value: f64,
    /// Vn (kN)
    pub vn_kn: f64,
    /// Sub-model selected at this sample
    pub model: ShearModel,
}

/// Full sweep output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    /// Input that was varied
    pub variable: InputField,
    /// Samples in sweep order
    pub points: Vec<SweepPoint>,
}

impl SweepResult {
    /// `(value, Vn)` pairs with Vn in the requested unit
    pub fn series(&self, unit: ForceUnit) -> Vec<(f64, f64)> {
        let factor = unit.factor_from_kn();
        self.points.iter().map(|p| (p.value, p.vn_kn * factor)).collect()
    }

    /// Sample values where the selected sub-model changes from the previous sample
    pub fn model_transitions(&self) -> Vec<(f64, ShearModel, ShearModel)> {
        self.points
            .windows(2)
            .filter(|w| w[0].model != w[1].model)
            .map(|w| (w[1].value, w[0].model, w[1].model))
            .collect()
    }

    /// Sample with the largest Vn
    pub fn peak(&self) -> Option<&SweepPoint> {
        self.points
            .iter()
            .max_by(|a, b| a.vn_kn.total_cmp(&b.vn_kn))
    }
}

/// Evaluate Vn at every sample of `spec`, holding the other inputs of `base`.
///
/// The base input and every swept input must pass
/// [`ShearInput::validate`]. Sweeping a/d moves the shear span with d fixed.
///
/// # Returns
///
/// * `Ok(SweepResult)` - One point per sample
/// * `Err(CalcError::InvalidInput)` - Bad spec, bad base input, or a sample
///   value that makes the input invalid (e.g. a sweep through zero)
pub fn sweep(base: &ShearInput, spec: &SweepSpec) -> CalcResult<SweepResult> {
    spec.validate()?;
    base.validate()?;

    let mut points = Vec::with_capacity(spec.points);
    for value in spec.values() {
        let input = base.with_value(spec.variable, value);
        input.validate()?;
        let vector = input.to_vector();
        let (model, vn_kn) = evaluate_vector(&vector);
        let value = input.value(spec.variable);
        trace!(variable = spec.variable.field_name(), value, vn_kn, model = %model, "sweep sample");
        points.push(SweepPoint { value, vn_kn, model });
    }

    debug!(
        label = %base.label,
        variable = spec.variable.field_name(),
        start = spec.start,
        end = spec.end,
        points = points.len(),
        "sweep complete"
    );

    Ok(SweepResult {
        variable: spec.variable,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::shear::calculate;

    fn base_input() -> ShearInput {
        ShearInput {
            label: "Sweep Base".to_string(),
            width_mm: 300.0,
            depth_mm: 300.0,
            shear_span_mm: 900.0,
            fc_mpa: 40.0,
            rho_percent: 1.0,
            ff_mpa: 900.0,
            ef_gpa: 60.0,
        }
    }

    #[test]
    fn test_values_are_inclusive_linspace() {
        let spec = SweepSpec::new(InputField::Width, 100.0, 500.0).with_points(5);
        assert_eq!(spec.values(), vec![100.0, 200.0, 300.0, 400.0, 500.0]);
    }

    #[test]
    fn test_values_for_degenerate_point_counts() {
        let spec = SweepSpec::new(InputField::Width, 100.0, 500.0);
        assert!(spec.with_points(0).values().is_empty());
        assert_eq!(spec.with_points(1).values(), vec![100.0]);
        assert!(spec.with_points(0).validate().is_err());
        assert!(spec.with_points(1).validate().is_err());
    }

    #[test]
    fn test_ratio_sweep_reports_evaluated_ratio() {
        let mut base = base_input();
        base.depth_mm = 333.3;
        let spec = SweepSpec::new(InputField::SpanDepthRatio, 2.47, 3.43).with_points(1000);
        let result = sweep(&base, &spec).unwrap();

        let mut rounded = 0;
        for (requested, point) in spec.values().into_iter().zip(&result.points) {
            let input = base.with_value(InputField::SpanDepthRatio, requested);
            let vector = input.to_vector();
            assert_eq!(point.value.to_bits(), vector.a_over_d.to_bits());
            assert_eq!(point.vn_kn.to_bits(), evaluate_vector(&vector).1.to_bits());
            if requested != point.value {
                rounded += 1;
            }
        }
        // (r * d) / d is not always r
        assert!(rounded > 0);
    }

    #[test]
    fn test_default_sweep() {
        let spec = SweepSpec::default_for(InputField::ConcreteStrength);
        assert_eq!(spec.points, DEFAULT_SWEEP_POINTS);
        let result = sweep(&base_input(), &spec).unwrap();
        assert_eq!(result.points.len(), 100);
        assert_eq!(result.points[0].value, 5.0);
        assert_eq!(result.points[99].value, 100.0);
    }

    #[test]
    fn test_sweep_matches_single_evaluations() {
        let base = base_input();
        let spec = SweepSpec::new(InputField::FrpModulus, 30.0, 90.0).with_points(7);
        let result = sweep(&base, &spec).unwrap();
        for point in &result.points {
            let single = calculate(&base.with_value(InputField::FrpModulus, point.value)).unwrap();
            assert_eq!(point.vn_kn, single.vn_kn);
            assert_eq!(point.model, single.model);
        }
    }

    #[test]
    fn test_sweep_crosses_rho_split() {
        let spec = SweepSpec::new(InputField::ReinforcementRatio, 1.0, 2.0).with_points(11);
        let result = sweep(&base_input(), &spec).unwrap();
        let transitions = result.model_transitions();
        assert_eq!(transitions.len(), 1);
        let (at, from, to) = transitions[0];
        assert!(at > 1.44 && at <= 1.5 + 1e-12);
        assert_eq!(from, ShearModel::Lm4);
        assert_eq!(to, ShearModel::Lm5);
    }

    #[test]
    fn test_ratio_sweep_moves_shear_span() {
        let spec = SweepSpec::new(InputField::SpanDepthRatio, 2.5, 3.0).with_points(2);
        let result = sweep(&base_input(), &spec).unwrap();
        let expected = calculate(&base_input().with_value(InputField::ShearSpan, 750.0)).unwrap();
        assert_eq!(result.points[0].vn_kn, expected.vn_kn);
    }

    #[test]
    fn test_series_in_newtons() {
        let spec = SweepSpec::new(InputField::Depth, 250.0, 300.0).with_points(3);
        let result = sweep(&base_input(), &spec).unwrap();
        let kn = result.series(ForceUnit::Kilonewtons);
        let n = result.series(ForceUnit::Newtons);
        for ((x1, v1), (x2, v2)) in kn.iter().zip(&n) {
            assert_eq!(x1, x2);
            assert_eq!(v1 * 1000.0, *v2);
        }
    }

    #[test]
    fn test_peak() {
        let spec = SweepSpec::new(InputField::ConcreteStrength, 20.0, 80.0).with_points(4);
        let result = sweep(&base_input(), &spec).unwrap();
        // f'c has a positive slope in LM4
        assert_eq!(result.peak().unwrap().value, 80.0);
    }

    #[test]
    fn test_invalid_specs() {
        let base = base_input();
        let spec = SweepSpec::new(InputField::Width, 100.0, 500.0).with_points(1);
        assert!(sweep(&base, &spec).is_err());

        let spec = SweepSpec::new(InputField::Width, f64::NAN, 500.0);
        assert!(sweep(&base, &spec).is_err());

        // Sweeping through zero makes an intermediate input invalid
        let spec = SweepSpec::new(InputField::Width, -100.0, 100.0).with_points(3);
        let err = sweep(&base, &spec).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "width_mm"));
    }

    #[test]
    fn test_spec_serialization_defaults_points() {
        let spec: SweepSpec =
            serde_json::from_str(r#"{ "variable": "ff_mpa", "start": 100.0, "end": 600.0 }"#).unwrap();
        assert_eq!(spec.variable, InputField::FrpStrength);
        assert_eq!(spec.points, DEFAULT_SWEEP_POINTS);
    }
}
