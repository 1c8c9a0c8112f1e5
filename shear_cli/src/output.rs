//! Rendering of results as text, CSV, or JSON.

use serde::Serialize;
use shear_core::calculations::{BatchEntry, InputField, ShearInput, ShearResult, SweepResult};
use shear_core::equations::ShearModel;
use shear_core::{CalcError, ForceUnit};

use crate::config::OutputFormat;

/// Presentation settings resolved from config and flags.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub format: OutputFormat,
    pub unit: ForceUnit,
    pub precision: usize,
}

#[derive(Serialize)]
struct EvalReport<'a> {
    input: &'a ShearInput,
    result: &'a ShearResult,
    unit: ForceUnit,
    vn: f64,
    within_calibration: bool,
}

#[derive(Serialize)]
struct SweepReportPoint {
    value: f64,
    vn: f64,
    model: ShearModel,
}

#[derive(Serialize)]
struct SweepReport<'a> {
    variable: InputField,
    base: &'a ShearInput,
    unit: ForceUnit,
    points: Vec<SweepReportPoint>,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CalcError> {
    serde_json::to_string_pretty(value).map_err(CalcError::from)
}

fn fmt_label(label: &str) -> &str {
    if label.is_empty() {
        "-"
    } else {
        label
    }
}

/// Quote a CSV field when it contains a delimiter, quote or newline.
fn csv_field(s: &str) -> String {
    if s.contains(|c: char| matches!(c, ',' | '"' | '\n')) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub fn render_eval(input: &ShearInput, result: &ShearResult, style: &Style) -> Result<String, CalcError> {
    let vn = result.vn(style.unit);
    let p = style.precision;
    let out = match style.format {
        OutputFormat::Json => to_json(&EvalReport {
            input,
            result,
            unit: style.unit,
            vn,
            within_calibration: result.within_calibration(),
        })?,
        OutputFormat::Csv => format!(
            "label,model,a_over_d,vn_{unit},warnings\n{},{},{},{:.p$},{}\n",
            csv_field(&input.label),
            result.model,
            result.a_over_d,
            vn,
            result.range_warnings.len(),
            unit = style.unit,
        ),
        OutputFormat::Text => {
            let mut s = String::new();
            if !input.label.is_empty() {
                s.push_str(&format!("{}\n", input.label));
            }
            s.push_str(&format!("Vn = {:.p$} {}  ({})\n", vn, style.unit, result.model));
            s.push_str(&format!(
                "  b = {} mm, d = {} mm, a = {} mm, a/d = {:.3}\n",
                input.width_mm, input.depth_mm, input.shear_span_mm, result.a_over_d
            ));
            s.push_str(&format!(
                "  f'c = {} MPa, ρt = {} %, f_f = {} MPa, E_f = {} GPa\n",
                input.fc_mpa, input.rho_percent, input.ff_mpa, input.ef_gpa
            ));
            for w in &result.range_warnings {
                s.push_str(&format!("  warning: {}\n", w.message()));
            }
            s
        }
    };
    Ok(out)
}

pub fn render_sweep(base: &ShearInput, result: &SweepResult, style: &Style) -> Result<String, CalcError> {
    let p = style.precision;
    let series = result.series(style.unit);
    let out = match style.format {
        OutputFormat::Json => to_json(&SweepReport {
            variable: result.variable,
            base,
            unit: style.unit,
            points: series
                .iter()
                .zip(&result.points)
                .map(|(&(value, vn), point)| SweepReportPoint {
                    value,
                    vn,
                    model: point.model,
                })
                .collect(),
        })?,
        OutputFormat::Csv => {
            let mut s = format!("{},vn_{},model\n", result.variable.field_name(), style.unit);
            for ((value, vn), point) in series.iter().zip(&result.points) {
                s.push_str(&format!("{},{:.p$},{}\n", value, vn, point.model));
            }
            s
        }
        OutputFormat::Text => {
            let header = match result.variable.unit() {
                "" => result.variable.symbol().to_string(),
                unit => format!("{} ({})", result.variable.symbol(), unit),
            };
            let vn_header = format!("Vn ({})", style.unit);
            let mut s = format!("{:>14}  {:>14}  model\n", header, vn_header);
            for ((value, vn), point) in series.iter().zip(&result.points) {
                s.push_str(&format!("{:>14.4}  {:>14.p$}  {}\n", value, vn, point.model));
            }
            for (at, from, to) in result.model_transitions() {
                s.push_str(&format!("model changes {} -> {} at {} = {}\n", from, to, result.variable.symbol(), at));
            }
            if let Some(peak) = result.peak() {
                s.push_str(&format!(
                    "peak Vn = {:.p$} {} at {} = {} ({})\n",
                    peak.vn_kn * style.unit.factor_from_kn(),
                    style.unit,
                    result.variable.symbol(),
                    peak.value,
                    peak.model
                ));
            }
            s
        }
    };
    Ok(out)
}

pub fn render_batch(entries: &[BatchEntry], style: &Style) -> Result<String, CalcError> {
    let p = style.precision;
    let out = match style.format {
        OutputFormat::Json => to_json(&entries)?,
        OutputFormat::Csv => {
            let mut s = format!("index,label,status,model,vn_{},message\n", style.unit);
            for entry in entries {
                match entry {
                    BatchEntry::Ok { index, result } => s.push_str(&format!(
                        "{},{},ok,{},{:.p$},\n",
                        index,
                        csv_field(&result.label),
                        result.model,
                        result.vn(style.unit)
                    )),
                    BatchEntry::Error { index, code, message } => s.push_str(&format!(
                        "{},,error,,,{}\n",
                        index,
                        csv_field(&format!("{}: {}", code, message))
                    )),
                }
            }
            s
        }
        OutputFormat::Text => {
            let mut s = String::new();
            for entry in entries {
                match entry {
                    BatchEntry::Ok { index, result } => {
                        s.push_str(&format!(
                            "[{}] {}: Vn = {:.p$} {} ({})\n",
                            index,
                            fmt_label(&result.label),
                            result.vn(style.unit),
                            style.unit,
                            result.model
                        ));
                        for w in &result.range_warnings {
                            s.push_str(&format!("      warning: {}\n", w.message()));
                        }
                    }
                    BatchEntry::Error { index, code, message } => {
                        s.push_str(&format!("[{}] error {}: {}\n", index, code, message));
                    }
                }
            }
            s
        }
    };
    Ok(out)
}

/// The calibrated input ranges, one line per input.
pub fn render_ranges(format: OutputFormat) -> Result<String, CalcError> {
    #[derive(Serialize)]
    struct Row {
        field: InputField,
        symbol: &'static str,
        unit: &'static str,
        min: f64,
        max: f64,
    }

    let rows: Vec<Row> = InputField::ALL
        .iter()
        .map(|&field| {
            let range = field.nominal_range();
            Row {
                field,
                symbol: field.symbol(),
                unit: field.unit(),
                min: range.min,
                max: range.max,
            }
        })
        .collect();

    let out = match format {
        OutputFormat::Json => to_json(&rows)?,
        OutputFormat::Csv => {
            let mut s = String::from("field,symbol,unit,min,max\n");
            for r in &rows {
                s.push_str(&format!("{},{},{},{},{}\n", r.field.field_name(), r.symbol, r.unit, r.min, r.max));
            }
            s
        }
        OutputFormat::Text => {
            let mut s = String::new();
            for r in &rows {
                let unit = if r.unit.is_empty() { "-" } else { r.unit };
                s.push_str(&format!("{:<14} {:<4} [{}, {}] {}\n", r.field.field_name(), r.symbol, r.min, r.max, unit));
            }
            s
        }
    };
    Ok(out)
}
