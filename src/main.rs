use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use quillr::config::Config;
use quillr::domain::{Acceptance, RunReport, TaskKind, Trace};
use quillr::services::Services;

fn setup_logging(level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quillr")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("quillr.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG wins over the configured level
    let env = env_logger::Env::default().default_filter_or(level.unwrap_or("info"));
    env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Run {
            task_kind,
            input,
            offline,
            json,
        } => {
            let config = Config {
                offline: config.offline || *offline,
                ..config
            };
            handle_run_command(task_kind, input, *json, cli.is_verbose(), &config).await
        }
        Commands::Kinds => handle_kinds_command(&config),
    }
}

async fn handle_run_command(task_kind: &str, input: &str, json: bool, verbose: bool, config: &Config) -> Result<()> {
    info!("Running task: kind={} input={:?}", task_kind, input);

    let services = Services::from_config(config)?;
    let backends = services.backends;
    if !json {
        if backends.mock_llm {
            println!("{}", "LLM key not set, using mock responses".yellow());
        }
        if backends.mock_search {
            println!("{}", "Search key not set, using mock results".yellow());
        }
        if config.offline {
            println!("{}", "Offline mode: all services mocked".yellow());
        }
        println!("{} {} {}", "Running".cyan(), task_kind.bold(), input.dimmed());
    }

    let workflow = services.workflow(config);
    match workflow.run(task_kind, input).await {
        Ok(report) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&report).context("Failed to serialize report")?);
            } else {
                print_report(&report, verbose);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", "Trace before failure:".red());
            print_trace(&err.trace);
            Err(err.into())
        }
    }
}

fn print_report(report: &RunReport, verbose: bool) {
    println!();
    println!("{}", "=== Content ===".green().bold());
    println!("{}", report.content);
    println!();
    println!("{} {}", "Image:".green(), report.image_ref);
    println!("{} {}", "Refinements:".green(), report.iteration_count);

    match &report.acceptance {
        Acceptance::Passed => println!("{} {}", "Review:".green(), "passed".green()),
        Acceptance::Forced { outstanding } => {
            println!(
                "{} {}",
                "Review:".green(),
                "not passed, accepted after the iteration cap".yellow().bold()
            );
            for item in outstanding {
                println!("  {} {}", "-".yellow(), item);
            }
        }
    }

    if verbose {
        println!();
        println!("{}", "=== Trace ===".cyan());
        print_trace(&report.trace);
    }
}

fn print_trace(trace: &Trace) {
    for entry in trace {
        println!(
            "  {} {:<10} {}",
            entry.at.format("%H:%M:%S").to_string().dimmed(),
            entry.stage.as_str().cyan(),
            entry.message
        );
    }
}

fn handle_kinds_command(config: &Config) -> Result<()> {
    let workflow = Services::offline().workflow(config);
    for kind in TaskKind::ALL {
        let status = if workflow.dispatcher().slot(kind).is_live() {
            "enabled".green()
        } else {
            "placeholder".yellow()
        };
        println!("{:<6} {:<12} {}", kind.as_str().bold(), status, kind.description());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    setup_logging(config.log_level.as_deref()).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    run_application(&cli, config).await.context("Application failed")?;

    Ok(())
}
