//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Vibho - Heuristic HR analytics
#[derive(Parser)]
#[command(name = "vibho")]
#[command(about = "Attendance, payroll and insight analytics for HR data", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Analytics config file (TOML)
    ///
    /// Defaults to ~/.local/share/vibho/config/analytics.toml when present,
    /// otherwise the built-in defaults.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed for reproducible output
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze attendance records (patterns, anomalies, predictions)
    ///
    /// Records are read from the inline argument, --file, or stdin.
    Attendance {
        /// Records as JSON (array or {"attendanceRecords": [...]})
        data: Option<String>,

        /// Read records from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Input format: json, csv
        #[arg(long, default_value = "json")]
        format: String,

        /// Reject records that are not in chronological order
        #[arg(long)]
        strict_order: bool,
    },

    /// Predict payroll cost for a month
    Payroll {
        /// Month (1-12)
        #[arg(long)]
        month: u32,

        /// Year (e.g. 2024)
        #[arg(long)]
        year: i32,

        /// Monthly history as JSON (array of {date, value}); synthesized if omitted
        #[arg(long)]
        history: Option<PathBuf>,

        /// Periods to forecast (default from config)
        #[arg(long)]
        horizon: Option<usize>,
    },

    /// Compose insights for a domain
    Insights {
        /// Domain: attendance, performance, payroll, recruitment
        domain: String,

        /// Domain payload as JSON
        data: Option<String>,

        /// Read the payload from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Reference date for deadline checks (YYYY-MM-DD, default today)
        #[arg(long)]
        today: Option<String>,
    },

    /// Forecast a raw series of {date, value} points
    Forecast {
        /// Series as JSON
        data: Option<String>,

        /// Read the series from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Periods to forecast (default from config)
        #[arg(long)]
        horizon: Option<usize>,
    },

    /// Inspect analytics configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the config file in effect
    Show,
    /// Show where the override file is looked up
    Path,
}
