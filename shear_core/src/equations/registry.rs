//! # Model Registry
//!
//! Descriptive metadata for the seven sub-models and the split thresholds,
//! used to print the model tree and coefficient table (`shear models`) and
//! to export it as JSON.
//!
//! ## Usage
//!
//! ```rust
//! use shear_core::equations::registry::{generate_models_markdown, ModelMetadata};
//! use shear_core::equations::ShearModel;
//!
//! let meta = ModelMetadata::of(ShearModel::Lm4);
//! assert_eq!(meta.name, "LM4");
//!
//! let markdown = generate_models_markdown();
//! assert!(markdown.contains("| LM7 |"));
//! ```

use serde::Serialize;

use super::shear_tree::{
    ModelCoefficients, ShearModel, DEEP_DEPTH_SPLIT_MM, DEPTH_SPLIT_MM, RHO_SPLIT_PERCENT,
    SPAN_RATIO_SPLIT, WIDE_WIDTH_SPLIT_MM, WIDTH_SPLIT_MM,
};

/// Label padded with `─` to `width` characters
fn rule(label: &str, width: usize) -> String {
    format!("{:─<width$}", format!("{} ", label), width = width)
}

/// The decision tree as box-drawing text, one leaf per line.
fn tree_diagram() -> String {
    let top = [
        format!("b ≤ {}", WIDTH_SPLIT_MM),
        format!("{} < b ≤ {}", WIDTH_SPLIT_MM, WIDE_WIDTH_SPLIT_MM),
        format!("b > {}", WIDE_WIDTH_SPLIT_MM),
    ];
    let mid = format!("{} < d ≤ {}", DEPTH_SPLIT_MM, DEEP_DEPTH_SPLIT_MM);
    let top_width = top.iter().map(|s| s.chars().count()).max().unwrap_or(0) + 2;
    let mid_width = mid.chars().count() + 2;
    let indent = " ".repeat(top_width);

    let rows = [
        (format!("{}┬─ a/d ≤ {}", rule(&top[0], top_width), SPAN_RATIO_SPLIT), ShearModel::Lm1),
        (format!("{}└─ a/d > {}", indent, SPAN_RATIO_SPLIT), ShearModel::Lm2),
        (format!("{}┬─ d ≤ {}", rule(&top[1], top_width), DEPTH_SPLIT_MM), ShearModel::Lm3),
        (
            format!("{}├─ {}┬─ ρt ≤ {}", indent, rule(&mid, mid_width), RHO_SPLIT_PERCENT),
            ShearModel::Lm4,
        ),
        (
            format!("{}│  {}└─ ρt > {}", indent, " ".repeat(mid_width), RHO_SPLIT_PERCENT),
            ShearModel::Lm5,
        ),
        (format!("{}└─ d > {}", indent, DEEP_DEPTH_SPLIT_MM), ShearModel::Lm6),
        (top[2].clone(), ShearModel::Lm7),
    ];

    let width = rows.iter().map(|(prefix, _)| prefix.chars().count()).max().unwrap_or(0) + 4;
    rows.iter()
        .map(|(prefix, model)| format!("{} {}\n", rule(prefix, width), model))
        .collect()
}

/// Operand symbols in coefficient order
pub const OPERAND_SYMBOLS: [&str; 8] = ["b", "d", "a", "a/d", "f'c", "ρt", "f_f", "E_f"];

/// A formula operand with its unit, for tables and help text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Variable {
    /// Display symbol
    pub symbol: &'static str,
    /// Human description
    pub description: &'static str,
    /// Unit string ("" for dimensionless)
    pub unit: &'static str,
}

/// Operand definitions in coefficient order
pub const VARIABLES: [Variable; 8] = [
    Variable { symbol: "b", description: "Section width", unit: "mm" },
    Variable { symbol: "d", description: "Effective depth", unit: "mm" },
    Variable { symbol: "a", description: "Shear span", unit: "mm" },
    Variable { symbol: "a/d", description: "Shear span to effective depth ratio", unit: "" },
    Variable { symbol: "f'c", description: "Concrete compressive strength", unit: "MPa" },
    Variable { symbol: "ρt", description: "FRP longitudinal reinforcement ratio", unit: "%" },
    Variable { symbol: "f_f", description: "FRP ultimate tensile strength", unit: "MPa" },
    Variable { symbol: "E_f", description: "FRP modulus of elasticity", unit: "GPa" },
];

/// Everything needed to describe a sub-model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelMetadata {
    /// Leaf identifier
    pub model: ShearModel,
    /// Short name ("LM1")
    pub name: &'static str,
    /// Region of the input space routed to this leaf
    pub region: &'static str,
    /// Coefficients and intercept
    pub coefficients: ModelCoefficients,
}

impl ModelMetadata {
    /// Metadata for one sub-model
    pub fn of(model: ShearModel) -> Self {
        ModelMetadata {
            model,
            name: model.name(),
            region: model.region(),
            coefficients: *model.coefficients(),
        }
    }

    /// Formula as text, e.g. `Vn = 0.3499·b + 0.1134·d − ... + 9.4873`
    pub fn formula(&self) -> String {
        let mut formula = String::from("Vn =");
        for (i, (w, symbol)) in self.coefficients.weights.iter().zip(OPERAND_SYMBOLS).enumerate() {
            let sign = if *w < 0.0 { "−" } else if i == 0 { "" } else { "+" };
            if sign.is_empty() {
                formula.push_str(&format!(" {}·{}", w.abs(), symbol));
            } else {
                formula.push_str(&format!(" {} {}·{}", sign, w.abs(), symbol));
            }
        }
        let sign = if self.coefficients.intercept < 0.0 { "−" } else { "+" };
        formula.push_str(&format!(" {} {}", sign, self.coefficients.intercept.abs()));
        formula
    }
}

/// Metadata for all seven sub-models in leaf order
pub fn all_models() -> Vec<ModelMetadata> {
    ShearModel::ALL.iter().copied().map(ModelMetadata::of).collect()
}

/// Markdown description of the tree, the operands and the coefficient table.
pub fn generate_models_markdown() -> String {
    let mut md = String::new();

    md.push_str("# FRP Shear Strength Models\n\n");
    md.push_str("Vn (kN) = Σ coefficient × operand + intercept, with the sub-model picked by:\n\n");
    md.push_str("```text\n");
    md.push_str(&tree_diagram());
    md.push_str("```\n\n");

    md.push_str("## Operands\n\n");
    md.push_str("| Symbol | Description | Unit |\n");
    md.push_str("|---|---|---|\n");
    for var in VARIABLES {
        let unit = if var.unit.is_empty() { "-" } else { var.unit };
        md.push_str(&format!("| {} | {} | {} |\n", var.symbol, var.description, unit));
    }
    md.push('\n');

    md.push_str("## Coefficients\n\n");
    md.push_str("| Model |");
    for symbol in OPERAND_SYMBOLS {
        md.push_str(&format!(" {} |", symbol));
    }
    md.push_str(" intercept |\n|---|");
    for _ in OPERAND_SYMBOLS {
        md.push_str("---|");
    }
    md.push_str("---|\n");
    for meta in all_models() {
        md.push_str(&format!("| {} |", meta.name));
        for w in meta.coefficients.weights {
            md.push_str(&format!(" {} |", w));
        }
        md.push_str(&format!(" {} |\n", meta.coefficients.intercept));
    }
    md.push('\n');

    md.push_str("## Regions\n\n");
    for meta in all_models() {
        md.push_str(&format!("- **{}** ({}): `{}`\n", meta.name, meta.region, meta.formula()));
    }

    md
}
