//! # Catalog CLI
//!
//! Console front-end over the `ProductStore` contract.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          catalog                                        │
//! │                                                                         │
//! │  parse args ──► load config.property ──► open_store ──┬─► subcommand   │
//! │                  (fatal on error, exit 1)              │   print, exit  │
//! │                                                        │                │
//! │                                                        └─► menu loop    │
//! │                                                            Ctrl-C is    │
//! │                                                            ignored      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr (`RUST_LOG`, default `info`) so stdout carries only
//! menu text and results.

mod cli;
mod commands;
mod menu;
mod output;

use std::process::ExitCode;

use anyhow::Context;
use catalog_db::{open_store, StoreConfig};
use clap::Parser;
use tokio::io::BufReader;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::menu::Menu;
use crate::output::Format;

/// Exit code for a failed one-shot subcommand.
const OPERATION_FAILED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Startup failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = StoreConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let store = open_store(&config)
        .await
        .with_context(|| format!("opening {} store at {}", config.source, config.path))?;

    info!(backend = store.backend(), path = %config.path, "Catalog ready");

    let format = Format::from_flag(cli.json);

    if let Some(cmd) = cli.cmd {
        return match commands::execute(store.as_ref(), cmd, format).await {
            Ok(text) => {
                println!("{}", text);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                Ok(ExitCode::from(OPERATION_FAILED))
            }
        };
    }

    tokio::spawn(ignore_interrupts());

    let input = BufReader::new(tokio::io::stdin());
    let mut menu = Menu::new(store, format, input, tokio::io::stdout());
    menu.run().await.context("console I/O failed")?;

    info!("Goodbye");
    Ok(ExitCode::SUCCESS)
}

/// Swallows Ctrl-C for the lifetime of the process so the menu keeps going.
async fn ignore_interrupts() {
    loop {
        match tokio::signal::ctrl_c().await {
            Ok(()) => warn!("Interrupt ignored, choose 0 to exit"),
            Err(e) => {
                warn!(error = %e, "Cannot listen for interrupts");
                return;
            }
        }
    }
}
