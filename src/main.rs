//! assetflow - static asset pipeline with a live-reload dev server.

mod actor;
mod cli;
mod config;
mod core;
mod embed;
mod logger;
mod pipeline;
mod reload;
mod task;
mod transform;
mod utils;

use anyhow::{Result, bail};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::PipelineConfig;
use owo_colors::Style;
use pipeline::Workflow;
use task::{TaskContext, preset};
use transform::TransformSettings;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.is_verbose());

    let config = PipelineConfig::load(&cli)?;

    match &cli.command {
        Commands::Dev { .. } => pipeline::run_workflow(&config, Workflow::Dev),
        Commands::Prod { .. } => pipeline::run_workflow(&config, Workflow::Prod),
        Commands::Run { tasks, .. } => run_tasks(&config, tasks),
        Commands::List => list_tasks(&config),
    }
}

/// Run named tasks one after another, stopping at the first failure.
fn run_tasks(config: &PipelineConfig, names: &[String]) -> Result<()> {
    let registry = preset::registry(config)?;
    let ctx = TaskContext {
        root: config.root.clone(),
        settings: TransformSettings::from_config(config),
    };

    for name in names {
        if let Err(e) = registry.run(name, &ctx) {
            log!("error"; "`{}` failed: {}", name, e);
            bail!("task `{name}` failed");
        }
    }
    Ok(())
}

fn list_tasks(config: &PipelineConfig) -> Result<()> {
    let registry = preset::registry(config)?;
    for name in registry.names() {
        if let Some(entry) = registry.get(name) {
            println!("{:<30} {}", name, logger::paint(entry.kind(), Style::new().dimmed()));
        }
    }
    Ok(())
}
