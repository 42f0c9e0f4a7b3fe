//! CLI command definitions

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::domain::{BudgetLevel, DEFAULT_DURATION_DAYS, TravelGroup};

/// Nomad - AI travel itinerary planner
#[derive(Parser)]
#[command(
    name = "nomad",
    about = "Research-backed day-by-day travel itineraries from a language model",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute; the interactive form runs when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate one itinerary and print it as Markdown
    Plan(PlanArgs),
}

/// Trip fields and output options for `nomad plan`
#[derive(Debug, Clone, clap::Args)]
pub struct PlanArgs {
    /// Where you are going, e.g. "Lisbon, Portugal"
    #[arg(short, long)]
    pub destination: String,

    /// First day of the trip (YYYY-MM-DD); defaults to today
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Trip length in days (1-10)
    #[arg(long, default_value_t = DEFAULT_DURATION_DAYS)]
    pub days: u32,

    /// Budget level (budget, mid-range, luxury)
    #[arg(short, long, default_value = "budget")]
    pub budget: BudgetLevel,

    /// Travel group (solo, couple, family, friends)
    #[arg(short, long, default_value = "solo")]
    pub group: TravelGroup,

    /// Completion API key; overrides the configured environment variable
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Also save the itinerary as a Markdown file
    #[arg(short, long)]
    pub save: bool,

    /// Directory for --save; defaults to the configured output dir
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Only print warnings and errors to stderr
    #[arg(short, long)]
    pub quiet: bool,
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nomad")
        .join("logs")
        .join("nomad.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let mut help = String::new();

    help.push_str("Budget levels:\n");
    for level in BudgetLevel::ALL {
        help.push_str(&format!("  {}\n", level));
    }
    help.push_str("\nTravel groups:\n");
    for group in TravelGroup::ALL {
        help.push_str(&format!("  {}\n", group));
    }

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}
