//! Registrar CLI - order and register tasks, workflows and launch plans
//!
//! This CLI provides a terminal interface to:
//! - Print the registration order of the entities defined in a set of packages
//! - Register them, or only their tasks, into a registry
//! - Show the effective configuration

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
pub mod output;

use commands::{order, register, ScanTarget};
use config::CliConfig;
pub use error::{CliError, CliResult};

/// Registrar CLI application
#[derive(Parser)]
#[command(name = "registrar")]
#[command(about = "Registrar - ordered registration of tasks, workflows and launch plans", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "REGISTRAR_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: output::OutputFormat,

    /// Directory holding the package manifests
    #[arg(long, env = "REGISTRAR_ROOT")]
    root: Option<PathBuf>,

    /// Packages to scan, comma separated
    #[arg(long, value_delimiter = ',')]
    pkgs: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Print the registration order
    Order(order::OrderArgs),

    /// Register entities in dependency order
    Register(register::RegisterArgs),

    /// Show configuration
    Config,
}

/// Run using the current process arguments.
pub async fn run() -> CliResult<()> {
    run_with_args(std::env::args_os()).await
}

/// Run using the provided argument iterator.
pub async fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| CliError::Config(format!("Cannot install logging: {}", e)))?;

    // Load config
    let config = CliConfig::load(cli.config.as_deref())?;

    // Execute command
    match cli.command {
        Commands::Order(args) => {
            let scan = ScanTarget::from_args(cli.root, cli.pkgs, &config)?;
            order::execute(args, &scan, cli.output)
        }
        Commands::Register(args) => {
            let scan = ScanTarget::from_args(cli.root, cli.pkgs, &config)?;
            register::execute(args, &scan, &config, cli.output).await
        }
        Commands::Config => output::print_single(&config, cli.output),
    }
}
