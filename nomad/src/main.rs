//! Nomad - AI travel itinerary planner
//!
//! CLI entry point: one-shot `plan` or the interactive form.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use nomad::cli::{Cli, Command, PlanArgs, generate_after_help};
use nomad::config::Config;
use nomad::domain::{SessionState, TripRequest};
use nomad::output::save_itinerary;
use nomad::pipeline::{ConsoleReporter, Orchestrator};
use nomad::repl::FormSession;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nomad")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("nomad.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    info!(
        "Nomad loaded config: provider={} model={} search={}",
        config.llm.provider, config.llm.model, config.search.provider
    );

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Plan(args)) => {
            debug!("main: matched Plan command");
            cmd_plan(&config, args).await
        }
        None => {
            debug!("main: no command, starting interactive form");
            cmd_interactive(&config).await
        }
    }
}

async fn cmd_plan(config: &Config, args: PlanArgs) -> Result<()> {
    debug!(destination = %args.destination, "cmd_plan: called");
    let api_key = config.resolve_api_key(args.api_key.as_deref());
    let reporter = Arc::new(ConsoleReporter::new(args.quiet));
    let orchestrator = Orchestrator::from_config(config, api_key.as_deref(), reporter)?;

    let request = TripRequest::new(
        args.destination.trim(),
        args.date.unwrap_or_else(|| Local::now().date_naive()),
        args.days,
        args.budget,
        args.group,
    );
    let session = SessionState::new();
    let itinerary = match orchestrator.run(&request, &session).await {
        Ok(itinerary) => itinerary,
        Err(e) => {
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", "hint:".cyan().bold(), hint);
            }
            return Err(e.into());
        }
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", itinerary).context("Failed to write itinerary")?;

    if args.save {
        let dir = args.output_dir.unwrap_or_else(|| config.output.dir.clone());
        let path = save_itinerary(&dir, &request.destination, &itinerary)?;
        eprintln!("Saved itinerary to {}", path.display());
    }
    Ok(())
}

async fn cmd_interactive(config: &Config) -> Result<()> {
    debug!("cmd_interactive: called");
    let api_key = config.resolve_api_key(None);
    let reporter = Arc::new(ConsoleReporter::new(false));
    let orchestrator = Orchestrator::from_config(config, api_key.as_deref(), reporter)?;

    FormSession::new(config.clone(), orchestrator).run().await
}
