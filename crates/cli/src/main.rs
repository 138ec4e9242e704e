// wattcast - household energy consumption predictor

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use wattcast_cli::commands::{self, PredictOptions};
use wattcast_core::UserInputs;
use wattcast_infra::{AppConfig, PredictionContext};
use wattcast_observability::LogFormat;

const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;

#[derive(Parser)]
#[command(name = "wattcast")]
#[command(about = "Predict household electricity usage from daily usage patterns")]
#[command(version)]
struct Cli {
    /// Model artifact (JSON). Defaults to $WATTCAST_MODEL_PATH or energy_model.json
    #[arg(long, global = true, value_name = "PATH")]
    model: Option<PathBuf>,

    /// Historical hourly dataset (CSV). Defaults to $WATTCAST_HISTORY_PATH or hourly_data.csv
    #[arg(long, global = true, value_name = "PATH")]
    history: Option<PathBuf>,

    /// Log encoding on stderr (text or json)
    #[arg(long, global = true, value_name = "FORMAT")]
    log_format: Option<LogFormat>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict consumption for an hour of the day
    #[command(after_help = "\
Examples:
  wattcast predict
  wattcast predict --hour 7 --month 12 --weekend --appliance-usage 25
  wattcast predict --explain --chart
  wattcast --model rf.json predict --json")]
    Predict {
        /// Hour of day
        #[arg(long, default_value_t = 19, value_parser = clap::value_parser!(u8).range(0..=23))]
        hour: u8,

        /// Month
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=12))]
        month: u8,

        /// Predict for a weekend day
        #[arg(long)]
        weekend: bool,

        /// Estimated high-power appliance usage level (0 = low, 30 = high)
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u8).range(0..=30))]
        appliance_usage: u8,

        /// Show every feature value and where it came from
        #[arg(long)]
        explain: bool,

        /// Append the average power by hour of day
        #[arg(long)]
        chart: bool,
    },

    /// Average power by hour of day from the historical dataset
    Hourly,

    /// Show the feature schema the model expects and the medians that fill it
    Schema,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    wattcast_observability::init(config.log_format);
    if config.paths_collide() {
        warn!(
            path = %config.model_path.display(),
            "model and dataset paths are identical"
        );
    }

    let mut warnings = Vec::new();
    let result = run(cli, &config, &mut warnings);

    for warning in &warnings {
        eprintln!("warning: {warning}");
    }

    match result {
        Ok(out) => {
            let mut stdout = std::io::stdout().lock();
            if stdout.write_all(out.as_bytes()).is_err() {
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn build_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::from_env().context("reading environment")?;
    if let Some(path) = &cli.model {
        config.model_path = path.clone();
    }
    if let Some(path) = &cli.history {
        config.history_path = path.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    Ok(config)
}

fn run(cli: Cli, config: &AppConfig, warnings: &mut Vec<String>) -> Result<String> {
    match cli.command {
        Commands::Predict {
            hour,
            month,
            weekend,
            appliance_usage,
            explain,
            chart,
        } => {
            let inputs = UserInputs::new(hour, month, weekend, appliance_usage)?;
            let ctx = PredictionContext::load(config)?;
            commands::predict(
                &ctx,
                inputs,
                PredictOptions {
                    explain,
                    chart,
                    json: cli.json,
                },
                warnings,
            )
        }
        Commands::Hourly => commands::hourly(config, cli.json),
        Commands::Schema => {
            let ctx = PredictionContext::load(config)?;
            commands::schema(&ctx, cli.json)
        }
    }
}
