use std::fs;
use std::path::Path;

use shear_core::calculations::{
    calculate_batch_json, calculate_with_policy, sweep, InputField, ShearInput, SweepSpec,
};
use shear_core::equations::{all_models, generate_models_markdown};
use shear_core::CalcError;
use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, OutputFormat, ShearConfig};
use crate::output::{self, Style};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{failed} of {total} batch entries failed")]
    BatchFailures { failed: usize, total: usize },
}

impl CliError {
    /// JSON body for `--json` error output
    pub fn to_json(&self) -> String {
        let value = match self {
            CliError::Calc(err) => serde_json::json!({ "code": err.error_code(), "error": err }),
            CliError::Config(err) => serde_json::json!({ "code": "CONFIG_ERROR", "message": err.to_string() }),
            CliError::BatchFailures { failed, total } => {
                serde_json::json!({ "code": "BATCH_FAILURES", "failed": failed, "total": total })
            }
        };
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| self.to_string())
    }
}

fn style(config: &ShearConfig) -> Style {
    Style {
        format: config.output.format,
        unit: config.output.unit,
        precision: config.output.precision,
    }
}

pub fn eval(input: ShearInput, config: &ShearConfig) -> Result<String, CliError> {
    let result = calculate_with_policy(&input, config.validation.range_policy)?;
    info!(label = %input.label, model = %result.model, vn_kn = result.vn_kn, "evaluated");
    Ok(output::render_eval(&input, &result, &style(config))?)
}

pub fn run_sweep(
    input: ShearInput,
    variable: InputField,
    from: Option<f64>,
    to: Option<f64>,
    config: &ShearConfig,
) -> Result<String, CliError> {
    let mut spec = SweepSpec::default_for(variable).with_points(config.sweep.points);
    if let Some(start) = from {
        spec.start = start;
    }
    if let Some(end) = to {
        spec.end = end;
    }
    let result = sweep(&input, &spec)?;
    info!(variable = variable.field_name(), points = result.points.len(), "sweep finished");
    Ok(output::render_sweep(&input, &result, &style(config))?)
}

/// Evaluate a batch file. Returns the rendered output and the number of
/// failed entries so the caller can print before setting the exit status.
pub fn batch(path: &Path, config: &ShearConfig) -> Result<(String, usize, usize), CliError> {
    let json = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
    let entries = calculate_batch_json(&json, config.validation.range_policy)?;
    let failed = entries.iter().filter(|e| !e.is_ok()).count();
    info!(path = %path.display(), total = entries.len(), failed, "batch finished");
    let rendered = output::render_batch(&entries, &style(config))?;
    Ok((rendered, failed, entries.len()))
}

pub fn models(format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&all_models()).map_err(|e| CliError::Calc(e.into()))
        }
        OutputFormat::Csv => {
            let mut s = String::from("model,b,d,a,a_over_d,fc,rho_t,f_f,e_f,intercept\n");
            for meta in all_models() {
                let weights: Vec<String> = meta.coefficients.weights.iter().map(|w| w.to_string()).collect();
                s.push_str(&format!("{},{},{}\n", meta.name, weights.join(","), meta.coefficients.intercept));
            }
            Ok(s)
        }
        OutputFormat::Text => Ok(generate_models_markdown()),
    }
}

pub fn ranges(format: OutputFormat) -> Result<String, CliError> {
    Ok(output::render_ranges(format)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shear_core::calculations::RangePolicy;
    use shear_core::ForceUnit;

    fn input() -> ShearInput {
        ShearInput {
            label: "B-1".to_string(),
            width_mm: 150.0,
            depth_mm: 400.0,
            shear_span_mm: 200.0,
            fc_mpa: 30.0,
            rho_percent: 1.5,
            ff_mpa: 1000.0,
            ef_gpa: 70.0,
        }
    }

    #[test]
    fn test_eval_worked_example() {
        let out = eval(input(), &ShearConfig::default()).unwrap();
        assert!(out.contains("Vn = 131.80 kN  (LM1)"));
    }

    #[test]
    fn test_eval_reject_policy() {
        let mut config = ShearConfig::default();
        config.validation.range_policy = RangePolicy::Reject;
        // a/d = 0.5 is outside [2.47, 3.43]
        let err = eval(input(), &config).unwrap_err();
        assert!(matches!(err, CliError::Calc(CalcError::OutOfRange { .. })));
        assert!(err.to_json().contains("OUT_OF_RANGE"));
    }

    #[test]
    fn test_sweep_uses_config_points() {
        let mut config = ShearConfig::default();
        config.sweep.points = 4;
        config.output.format = OutputFormat::Csv;
        config.output.unit = ForceUnit::Newtons;
        let out = run_sweep(input(), InputField::Width, Some(100.0), Some(200.0), &config).unwrap();
        assert_eq!(out.lines().count(), 5);
        assert!(out.starts_with("width_mm,vn_N,model"));
    }

    #[test]
    fn test_batch_counts_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("members.json");
        fs::write(
            &path,
            r#"[{ "width_mm": 150, "depth_mm": 400, "shear_span_mm": 200, "fc_mpa": 30,
                  "rho_percent": 1.5, "ff_mpa": 1000, "ef_gpa": 70 },
                { "width_mm": "wide" }]"#,
        )
        .unwrap();
        let (out, failed, total) = batch(&path, &ShearConfig::default()).unwrap();
        assert_eq!((failed, total), (1, 2));
        assert!(out.contains("LM1"));

        let err = batch(&dir.path().join("missing.json"), &ShearConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Calc(CalcError::FileError { .. })));
    }

    #[test]
    fn test_models_csv() {
        let out = models(OutputFormat::Csv).unwrap();
        assert_eq!(out.lines().count(), 8);
        assert!(out.contains("LM1,0.3499,0.1134,0.0262,-38.0757,0.4744,13.9273,-0.0277,0.4406,9.4873"));
    }
}
