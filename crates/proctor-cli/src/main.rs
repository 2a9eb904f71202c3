//! Proctor CLI Application
//!
//! Command-line interface for the Proctor study supervisor.

mod args;
mod cli;
mod renderer;

use std::sync::Arc;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use proctor_core::{Config, SupervisorBuilder};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        config,
        no_color,
        command,
    } = Args::parse();

    let config = Config::load(config.as_deref()).context("Failed to load configuration")?;
    let renderer = TerminalRenderer::new(!no_color);

    let mut builder = SupervisorBuilder::new()
        .with_database_path(database_file)
        .with_config(config);
    if matches!(command, Some(Watch)) {
        builder = builder.with_sink(Arc::new(renderer.clone()));
    }
    let supervisor = builder
        .build()
        .await
        .context("Failed to initialize supervisor")?;

    info!("Proctor started");

    let cli = Cli::new(supervisor, renderer);
    match command {
        Some(Plan { command }) => cli.handle_plan_command(command).await,
        Some(Checkin { command }) => cli.handle_checkin_command(command).await,
        Some(Today(args)) => cli.today(args).await,
        Some(Tick(args)) => cli.tick(args).await,
        Some(Watch) => cli.watch().await,
        Some(Export(args)) => cli.export(args).await,
        None => cli.list_plans().await,
    }
}
