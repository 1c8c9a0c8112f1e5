//! # Unit Types
//!
//! Force wrappers for the shear strength output. The regression is fitted in
//! kilonewtons; newtons are a presentation choice applied after evaluation.
//!
//! Inputs stay as plain `f64` fields with unit suffixes (`width_mm`,
//! `fc_mpa`, `ef_gpa`), since the formula consumes them as fixed-unit
//! operands and never converts them.
//!
//! ## Example
//!
//! ```rust
//! use shear_core::units::{Kilonewtons, Newtons};
//!
//! let vn = Kilonewtons(131.8);
//! let vn_n: Newtons = vn.into();
//! assert_eq!(vn_n.0, 131_800.0);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilonewtons(pub f64);

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

impl From<Kilonewtons> for Newtons {
    fn from(kn: Kilonewtons) -> Self {
        Newtons(kn.0 * 1000.0)
    }
}

/// Output unit selected by the caller for Vn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ForceUnit {
    /// Kilonewtons (native unit of the regression)
    #[default]
    #[serde(rename = "kN")]
    Kilonewtons,
    /// Newtons
    #[serde(rename = "N")]
    Newtons,
}

impl ForceUnit {
    /// Multiplier applied to a kN value to express it in this unit
    pub fn factor_from_kn(self) -> f64 {
        match self {
            ForceUnit::Kilonewtons => 1.0,
            ForceUnit::Newtons => 1000.0,
        }
    }

    /// Convert a kN value into this unit
    pub fn from_kn(self, vn: Kilonewtons) -> f64 {
        match self {
            ForceUnit::Kilonewtons => vn.0,
            ForceUnit::Newtons => Newtons::from(vn).0,
        }
    }

    /// Unit symbol for display
    pub fn symbol(self) -> &'static str {
        match self {
            ForceUnit::Kilonewtons => "kN",
            ForceUnit::Newtons => "N",
        }
    }
}

impl fmt::Display for ForceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for ForceUnit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kn" | "kilonewtons" => Ok(ForceUnit::Kilonewtons),
            "n" | "newtons" => Ok(ForceUnit::Newtons),
            _ => Err(CalcError::invalid_input("unit", s, "Expected 'kN' or 'N'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kn_to_n() {
        let n: Newtons = Kilonewtons(1.5).into();
        assert_eq!(n.0, 1500.0);
    }

    #[test]
    fn test_force_unit_conversion() {
        let vn = Kilonewtons(131.8);
        assert_eq!(ForceUnit::Kilonewtons.from_kn(vn), 131.8);
        assert_eq!(ForceUnit::Newtons.from_kn(vn), 131.8 * 1000.0);
        assert_eq!(ForceUnit::Newtons.factor_from_kn(), 1000.0);
    }

    #[test]
    fn test_parse_unit() {
        assert_eq!("kN".parse::<ForceUnit>().unwrap(), ForceUnit::Kilonewtons);
        assert_eq!(" n ".parse::<ForceUnit>().unwrap(), ForceUnit::Newtons);
        assert!("lbf".parse::<ForceUnit>().is_err());
    }

    #[test]
    fn test_serialization() {
        assert_eq!(serde_json::to_string(&Kilonewtons(12.5)).unwrap(), "12.5");
        assert_eq!(serde_json::to_string(&ForceUnit::Newtons).unwrap(), "\"N\"");
        let unit: ForceUnit = serde_json::from_str("\"kN\"").unwrap();
        assert_eq!(unit, ForceUnit::Kilonewtons);
    }
}
