//! # Shear Capacity Calculations
//!
//! Caller-side operations built on the model tree. Each follows the pattern:
//!
//! - `*Input` / `*Spec` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - a pure function `input -> CalcResult<*Result>`
//!
//! ## Available Calculations
//!
//! - [`shear`] - Single evaluation with validation and range checks
//! - [`sweep`] - Vn against one input over an interval

pub mod shear;
pub mod sweep;

use serde::{Deserialize, Serialize};

pub use shear::{
    calculate, calculate_with_policy, InputField, NominalRange, RangePolicy, RangeWarning,
    ShearInput, ShearResult,
};
pub use sweep::{sweep, SweepPoint, SweepResult, SweepSpec, DEFAULT_SWEEP_POINTS};

use crate::errors::CalcResult;

/// Outcome of one entry in a batch evaluation.
///
/// Failures are kept per entry so one malformed record does not hide the
/// results of the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchEntry {
    /// Evaluation succeeded
    Ok { index: usize, result: ShearResult },
    /// Parsing or evaluation failed
    Error {
        index: usize,
        code: String,
        message: String,
    },
}

impl BatchEntry {
    pub fn is_ok(&self) -> bool {
        matches!(self, BatchEntry::Ok { .. })
    }
}

/// Evaluate every record of a JSON array of [`ShearInput`] objects.
///
/// The outer document must be a JSON array; each element is parsed and
/// evaluated on its own.
pub fn calculate_batch_json(json: &str, policy: RangePolicy) -> CalcResult<Vec<BatchEntry>> {
    let records: Vec<serde_json::Value> = serde_json::from_str(json)?;

    let entries = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let outcome = serde_json::from_value::<ShearInput>(record)
                .map_err(Into::into)
                .and_then(|input| calculate_with_policy(&input, policy));
            match outcome {
                Ok(result) => BatchEntry::Ok { index, result },
                Err(err) => BatchEntry::Error {
                    index,
                    code: err.error_code().to_string(),
                    message: err.to_string(),
                },
            }
        })
        .collect();

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::ShearModel;

    #[test]
    fn test_batch_mixed_entries() {
        let json = r#"[
            { "label": "B-1", "width_mm": 300, "depth_mm": 300, "shear_span_mm": 900,
              "fc_mpa": 40, "rho_percent": 1.0, "ff_mpa": 900, "ef_gpa": 60 },
            { "label": "B-2", "width_mm": 300, "depth_mm": 300 },
            { "label": "B-3", "width_mm": 0, "depth_mm": 300, "shear_span_mm": 900,
              "fc_mpa": 40, "rho_percent": 1.0, "ff_mpa": 900, "ef_gpa": 60 }
        ]"#;

        let entries = calculate_batch_json(json, RangePolicy::Warn).unwrap();
        assert_eq!(entries.len(), 3);

        match &entries[0] {
            BatchEntry::Ok { index, result } => {
                assert_eq!(*index, 0);
                assert_eq!(result.model, ShearModel::Lm4);
            }
            other => panic!("expected success, got {:?}", other),
        }
        match &entries[1] {
            BatchEntry::Error { code, .. } => assert_eq!(code, "MISSING_FIELD"),
            other => panic!("expected error, got {:?}", other),
        }
        match &entries[2] {
            BatchEntry::Error { code, .. } => assert_eq!(code, "INVALID_INPUT"),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_batch_requires_array() {
        let err = calculate_batch_json("{\"width_mm\": 1}", RangePolicy::Warn).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_batch_entry_serialization() {
        let entry = BatchEntry::Error {
            index: 4,
            code: "MISSING_FIELD".to_string(),
            message: "Missing required field: fc_mpa".to_string(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"status\":\"error\""));
    }
}
