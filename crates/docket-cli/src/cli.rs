//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Docket CLI - Estimate claim exposure and rank next actions for a case.
#[derive(Debug, Parser)]
#[command(name = "docket")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Case file (JSON)
    #[arg(long, global = true, env = "DOCKET_CASE")]
    pub case: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true, env = "DOCKET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log engine activity (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a scenario and report per-claim exposure
    Run(RunArgs),

    /// Show fact coverage scores
    Coverage(CoverageArgs),

    /// Rank next actions by return on effort
    Actions(ActionsArgs),

    /// List the case's scenarios, seeding defaults if there are none
    Scenarios,
}

/// Options shared by commands that simulate.
#[derive(Debug, Clone, Default, Parser)]
pub struct SimulationArgs {
    /// Scenario name or id (engine defaults when omitted)
    #[arg(short, long)]
    pub scenario: Option<String>,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Monte Carlo draws per claim
    #[arg(long)]
    pub samples: Option<usize>,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    #[command(flatten)]
    pub simulation: SimulationArgs,
}

/// Arguments for the coverage command.
#[derive(Debug, Parser)]
pub struct CoverageArgs {
    /// Only list facts flagged as missing support
    #[arg(short, long)]
    pub missing: bool,
}

/// Arguments for the actions command.
#[derive(Debug, Parser)]
pub struct ActionsArgs {
    #[command(flatten)]
    pub simulation: SimulationArgs,

    /// Maximum number of actions
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}
