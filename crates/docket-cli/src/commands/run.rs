//! Run command implementation.

use super::{engine_config, resolve_scenario};
use crate::case_file::CaseFile;
use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use docket_engine::{CancelToken, CaseEngine, Overrides};
use std::path::Path;

/// Execute the run command.
pub fn execute_run(
    args: RunArgs,
    case: &mut CaseFile,
    path: &Path,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let scenario = resolve_scenario(case, path, args.simulation.scenario.as_deref())?;
    let engine_config = engine_config(&config.engine, &args.simulation)?;

    let mut engine = CaseEngine::load(&*case, case.case_id, engine_config)?;
    let report = engine.compute_scenario(&scenario, &Overrides::none(), &CancelToken::new())?;
    tracing::debug!("{}", engine.metrics().summary());

    println!("{}", formatter.format_report(&report)?);

    Ok(())
}
