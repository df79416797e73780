//! Vibho CLI - Heuristic HR analytics
//!
//! Usage:
//!   vibho attendance --file records.csv --format csv
//!   vibho payroll --month 7 --year 2024
//!   vibho insights performance '{"reviews": [{"rating": 4}]}'
//!   vibho forecast --file series.json --horizon 6
//!
//! Results are printed to stdout as JSON. Failures print
//! `{"success": false, "message": ...}` and exit with status 1.

mod cli;
mod commands;


use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match usage_failure(e) {
            Ok(body) => {
                println!("{}", body);
                std::process::exit(1);
            }
            Err(e) => e.exit(),
        },
    };

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // stdout carries the JSON result, so logs go to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    match run(&cli) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            println!("{}", commands::failure(&e));
            std::process::exit(1);
        }
    }
}

/// Map an argument error to the failure body.
///
/// Help and version requests are handed back so clap can print them.
fn usage_failure(err: clap::Error) -> std::result::Result<String, clap::Error> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Err(err),
        _ => Ok(commands::failure(&anyhow::Error::from(err))),
    }
}

fn run(cli: &Cli) -> Result<String> {
    let value = match &cli.command {
        Commands::Attendance {
            data,
            file,
            format,
            strict_order,
        } => {
            let (config, mut entropy) = commands::session(cli.config.as_deref(), cli.seed)?;
            let format = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let input = commands::read_input(data.as_deref(), file.as_deref())?;
            commands::cmd_attendance(&input, format, *strict_order, &config, &mut entropy)?
        }
        Commands::Payroll {
            month,
            year,
            history,
            horizon,
        } => {
            let (config, mut entropy) = commands::session(cli.config.as_deref(), cli.seed)?;
            commands::cmd_payroll(
                *month,
                *year,
                history.as_deref(),
                *horizon,
                &config,
                &mut entropy,
            )?
        }
        Commands::Insights {
            domain,
            data,
            file,
            today,
        } => {
            let (config, mut entropy) = commands::session(cli.config.as_deref(), cli.seed)?;
            let input = commands::read_input(data.as_deref(), file.as_deref())?;
            commands::cmd_insights(domain, &input, today.as_deref(), &config, &mut entropy)?
        }
        Commands::Forecast {
            data,
            file,
            horizon,
        } => {
            let (config, mut entropy) = commands::session(cli.config.as_deref(), cli.seed)?;
            let input = commands::read_input(data.as_deref(), file.as_deref())?;
            commands::cmd_forecast(&input, *horizon, &config, &mut entropy)?
        }
        Commands::Config { action } => match action {
            // Raw TOML, not JSON
            ConfigAction::Show => return commands::cmd_config_show(cli.config.as_deref()),
            ConfigAction::Path => commands::cmd_config_path(cli.config.as_deref()),
        },
    };

    commands::render(&value, cli.pretty)
}
