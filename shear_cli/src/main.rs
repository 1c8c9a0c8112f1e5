//! # Shear CLI
//!
//! Command-line front end for the FRP shear capacity model: single
//! evaluations, sensitivity sweeps, batch files, and model/range listings.

mod cli;
mod commands;
mod config;
mod logging;
mod output;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;

use cli::{Cli, Commands};
use commands::CliError;
use config::{OutputFormat, ShearConfig};

fn run(cli: Cli) -> Result<(String, ExitCode), CliError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
    let config = ShearConfig::load(cli.config.as_deref(), &cwd, Some(&cli.overrides()))?;
    tracing::debug!(?config, "resolved configuration");

    let format = config.output.format;
    let out = match cli.command {
        Commands::Eval(args) => commands::eval(args.into(), &config)?,
        Commands::Sweep {
            input,
            variable,
            from,
            to,
            ..
        } => commands::run_sweep(input.into(), variable, from, to, &config)?,
        Commands::Batch { file } => {
            let (out, failed, total) = commands::batch(&file, &config)?;
            if failed > 0 {
                let err = CliError::BatchFailures { failed, total };
                eprintln!("Error: {}", err);
                return Ok((out, ExitCode::FAILURE));
            }
            out
        }
        Commands::Models => commands::models(format)?,
        Commands::Ranges => commands::ranges(format)?,
    };
    Ok((out, ExitCode::SUCCESS))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let json_errors = cli.json || cli.format == Some(OutputFormat::Json);
    match run(cli) {
        Ok((out, code)) => {
            let mut stdout = io::stdout().lock();
            if stdout.write_all(out.as_bytes()).and_then(|_| stdout.flush()).is_err() {
                return ExitCode::FAILURE;
            }
            code
        }
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("Error: {}", err);
            if json_errors {
                println!("{}", err.to_json());
            }
            ExitCode::FAILURE
        }
    }
}
