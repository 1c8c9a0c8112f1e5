use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use shear_core::calculations::{InputField, RangePolicy, ShearInput};
use shear_core::ForceUnit;

use crate::config::{CliOverrides, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    name = "shear",
    version,
    about = "Nominal shear strength (Vn) of FRP-reinforced concrete members"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Config file (default: ./shear.toml if present)")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Output unit for Vn: kN or N")]
    pub unit: Option<ForceUnit>,

    #[arg(long, global = true, value_enum, help = "Output format")]
    pub format: Option<OutputFormat>,

    #[arg(long, global = true, conflicts_with = "format", help = "Shorthand for --format json")]
    pub json: bool,

    #[arg(long, global = true, help = "Decimal places for Vn")]
    pub precision: Option<usize>,

    #[arg(long, global = true, help = "Out-of-range inputs: ignore, warn or reject")]
    pub range_policy: Option<RangePolicy>,

    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase log verbosity")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate Vn for one member
    Eval(InputArgs),

    /// Evaluate Vn over a range of one input, holding the rest fixed
    Sweep {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, help = "Input to vary: b, d, a, a/d, fc, rho, ff, ef")]
        variable: InputField,
        #[arg(long, allow_negative_numbers = true, help = "First value (default depends on variable)")]
        from: Option<f64>,
        #[arg(long, allow_negative_numbers = true, help = "Last value (default depends on variable)")]
        to: Option<f64>,
        #[arg(long, help = "Number of samples")]
        points: Option<usize>,
    },

    /// Evaluate every member in a JSON array file
    Batch {
        file: PathBuf,
    },

    /// Print the model tree and coefficient table
    Models,

    /// Print the calibrated input ranges
    Ranges,
}

/// The seven member inputs; a/d is derived as a / d.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    #[arg(long, default_value = "", help = "Member label")]
    pub label: String,
    #[arg(long = "b", allow_negative_numbers = true, help = "Section width b (mm)")]
    pub width_mm: f64,
    #[arg(long = "d", allow_negative_numbers = true, help = "Effective depth d (mm)")]
    pub depth_mm: f64,
    #[arg(long = "a", allow_negative_numbers = true, help = "Shear span a (mm)")]
    pub shear_span_mm: f64,
    #[arg(long = "fc", allow_negative_numbers = true, help = "Concrete compressive strength f'c (MPa)")]
    pub fc_mpa: f64,
    #[arg(long = "rho", allow_negative_numbers = true, help = "FRP reinforcement ratio ρt (%)")]
    pub rho_percent: f64,
    #[arg(long = "ff", allow_negative_numbers = true, help = "FRP tensile strength f_f (MPa)")]
    pub ff_mpa: f64,
    #[arg(long = "ef", allow_negative_numbers = true, help = "FRP modulus E_f (GPa)")]
    pub ef_gpa: f64,
}

impl From<InputArgs> for ShearInput {
    fn from(args: InputArgs) -> Self {
        ShearInput {
            label: args.label,
            width_mm: args.width_mm,
            depth_mm: args.depth_mm,
            shear_span_mm: args.shear_span_mm,
            fc_mpa: args.fc_mpa,
            rho_percent: args.rho_percent,
            ff_mpa: args.ff_mpa,
            ef_gpa: args.ef_gpa,
        }
    }
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        let points = match &self.command {
            Commands::Sweep { points, .. } => *points,
            _ => None,
        };
        CliOverrides {
            unit: self.unit,
            format: if self.json { Some(OutputFormat::Json) } else { self.format },
            precision: self.precision,
            points,
            range_policy: self.range_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_eval() {
        let cli = Cli::try_parse_from([
            "shear", "--unit", "N", "eval", "--b", "150", "--d", "400", "--a", "200", "--fc", "30",
            "--rho", "1.5", "--ff", "1000", "--ef", "70",
        ])
        .unwrap();
        assert_eq!(cli.unit, Some(ForceUnit::Newtons));
        match cli.command {
            Commands::Eval(args) => {
                let input: ShearInput = args.into();
                assert_eq!(input.width_mm, 150.0);
                assert_eq!(input.a_over_d(), 0.5);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_sweep_variable_labels() {
        let cli = Cli::try_parse_from([
            "shear", "sweep", "--variable", "a/d", "--b", "300", "--d", "300", "--a", "900", "--fc", "40",
            "--rho", "1", "--ff", "900", "--ef", "60", "--points", "5", "--json",
        ])
        .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.points, Some(5));
        assert_eq!(overrides.format, Some(OutputFormat::Json));
        match cli.command {
            Commands::Sweep { variable, .. } => assert_eq!(variable, InputField::SpanDepthRatio),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_missing_input_is_rejected() {
        let err = Cli::try_parse_from(["shear", "eval", "--b", "150"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_non_numeric_input_is_rejected() {
        let err = Cli::try_parse_from([
            "shear", "eval", "--b", "wide", "--d", "400", "--a", "200", "--fc", "30", "--rho", "1.5",
            "--ff", "1000", "--ef", "70",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
