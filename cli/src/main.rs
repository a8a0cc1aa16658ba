//! # gradebook CLI
//!
//! Command-line interface for the school records tool.
//!
//! ## Usage
//!
//! - `gradebook records list -p grade=高一 -p start_date=2024-09-01` - List records
//! - `gradebook records update 7 --file record.json` - Replace a record
//! - `gradebook route /record/42` - Resolve a page location
//! - `gradebook routes` - Show the page route table

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

use commands::{records_command, route_command, routes_command, RecordsAction};
use config::CliConfigLoader;

/// gradebook - client for the school records server
#[derive(Parser)]
#[command(name = "gradebook")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Client for the school records server and its page routes")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base URL override
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Page router base path override
    #[arg(long, global = true)]
    app_base: Option<String>,

    /// Extra request header, repeatable
    #[arg(long = "header", value_name = "KEY=VALUE", global = true)]
    headers: Vec<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with the records resource
    Records {
        #[command(subcommand)]
        action: RecordsAction,
    },

    /// Resolve a location against the page route table
    Route {
        /// Location such as /record/42
        location: String,
    },

    /// Show the page route table
    Routes,
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> Result<CliConfigLoader> {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }

    if let Some(base_url) = &cli.base_url {
        loader = loader.with_base_url_override(base_url.clone());
    }

    if let Some(app_base) = &cli.app_base {
        loader = loader.with_app_base_override(app_base.clone());
    }

    if let Some(timeout) = cli.timeout {
        loader = loader.with_timeout_override(timeout);
    }

    for header in &cli.headers {
        let (key, value) = header
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected KEY=VALUE for --header, got '{}'", header))?;
        loader = loader.with_header_override(key.to_string(), value.to_string());
    }

    Ok(loader)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // An explicit RUST_LOG wins unless -v asks for debug output
    if !cli.verbose && std::env::var_os("RUST_LOG").is_some() {
        gradebook_core::init_tracing();
    } else {
        gradebook_core::init_tracing_with_debug(cli.verbose);
    }

    let config_loader = build_config_loader(&cli)?;

    match cli.command {
        Commands::Records { action } => records_command(action, config_loader).await,
        Commands::Route { location } => route_command(location, config_loader).await,
        Commands::Routes => routes_command(config_loader).await,
    }
}
