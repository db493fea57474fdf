// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod commands;
mod exit_error;
mod output;

use clap::{Parser, Subcommand};
use exit_error::ExitError;
use output::OutputFormat;
use tracing_subscriber::EnvFilter;

/// Agentless VM security scan orchestrator.
#[derive(Parser)]
#[command(name = "vmscan", version = build_version())]
struct Cli {
    /// Output format for commands that report structured results.
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a scan against a TOML scan config (targets + family selection).
    Scan(commands::scan::ScanArgs),
    /// Render the per-family YAML document handed to the scanner CLI.
    RenderConfig(commands::render_config::RenderConfigArgs),
}

fn build_version() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_GIT_HASH"), ")")
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    if let Err(err) = run().await {
        eprintln!("error: {err}");
        std::process::exit(err.code);
    }
}

async fn run() -> Result<(), ExitError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Scan(args) => commands::scan::run(args, cli.format).await?,
        Command::RenderConfig(args) => commands::render_config::run(args).await?,
    }
    Ok(())
}
