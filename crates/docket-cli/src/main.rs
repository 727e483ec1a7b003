//! Docket CLI - Scenario outcome estimates for litigation cases.

use anyhow::Context;
use clap::Parser;
use docket_cli::commands;
use docket_cli::{CaseFile, Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Determine output format
    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    let path = cli
        .case
        .context("No case file given (use --case or DOCKET_CASE)")?;
    let mut case = CaseFile::load(&path)
        .with_context(|| format!("Failed to read case file {}", path.display()))?;

    match cli.command {
        Command::Run(args) => commands::execute_run(args, &mut case, &path, &config, &formatter)?,
        Command::Coverage(args) => commands::execute_coverage(args, &case, &config, &formatter)?,
        Command::Actions(args) => {
            commands::execute_actions(args, &mut case, &path, &config, &formatter)?
        }
        Command::Scenarios => commands::execute_scenarios(&mut case, &path, &formatter)?,
    }

    Ok(())
}
