//! Command implementations.

pub mod actions;
pub mod coverage;
pub mod run;
pub mod scenarios;

pub use self::actions::execute_actions;
pub use self::coverage::execute_coverage;
pub use self::run::execute_run;
pub use self::scenarios::execute_scenarios;

use crate::case_file::CaseFile;
use crate::cli::SimulationArgs;
use crate::error::{CliError, Result};
use docket_domain::EntityId;
use docket_engine::{EngineConfig, ResolvedScenario, ScenarioManager};
use std::path::Path;

/// Apply command-line overrides on top of the configured engine parameters.
pub fn engine_config(base: &EngineConfig, args: &SimulationArgs) -> Result<EngineConfig> {
    let mut config = base.clone();
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(samples) = args.samples {
        config.samples = samples;
    }
    config.validate()?;
    Ok(config)
}

/// Resolve a scenario by id or case-insensitive name.
///
/// No selector means engine defaults. Selecting by name seeds the default
/// scenarios first if the case has none, and writes them back to the file.
pub fn resolve_scenario(
    case: &mut CaseFile,
    path: &Path,
    selector: Option<&str>,
) -> Result<ResolvedScenario> {
    let Some(selector) = selector else {
        return Ok(ResolvedScenario::engine_defaults());
    };

    let case_id = case.case_id;
    let manager = ScenarioManager::load_or_seed(case, case_id)?;
    if case.save_if_dirty(path)? {
        tracing::info!("Seeded default scenarios into {}", path.display());
    }

    let model = match selector.parse::<EntityId>() {
        Ok(id) => manager.find(id),
        Err(_) => manager.find_by_name(selector),
    }
    .ok_or_else(|| {
        let names: Vec<&str> = manager.scenarios().iter().map(|s| s.name.as_str()).collect();
        CliError::InvalidInput(format!(
            "Unknown scenario '{}' (available: {})",
            selector,
            names.join(", ")
        ))
    })?;

    let model_id = model.id;
    Ok(manager.resolve_from(&*case, Some(model_id))?)
}
