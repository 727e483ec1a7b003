//! Actions command implementation.

use super::{engine_config, resolve_scenario};
use crate::case_file::CaseFile;
use crate::cli::ActionsArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use docket_engine::{CancelToken, CaseEngine, EngineConfig};
use std::path::Path;

/// Execute the actions command.
pub fn execute_actions(
    args: ActionsArgs,
    case: &mut CaseFile,
    path: &Path,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let scenario = resolve_scenario(case, path, args.simulation.scenario.as_deref())?;
    let engine_config = actions_config(&config.engine, &args)?;

    let mut engine = CaseEngine::load(&*case, case.case_id, engine_config)?;
    let actions = engine.compute_action_candidates(&scenario, &CancelToken::new())?;
    tracing::debug!("{}", engine.metrics().summary());

    println!("{}", formatter.format_actions(&actions)?);

    Ok(())
}

/// Engine parameters for ranking; `--limit` can only narrow the configured maximum.
fn actions_config(base: &EngineConfig, args: &ActionsArgs) -> Result<EngineConfig> {
    let mut config = engine_config(base, &args.simulation)?;

    if let Some(limit) = args.limit {
        if limit == 0 {
            return Err(CliError::InvalidInput("Limit must be at least 1".to_string()));
        }
        config.max_actions = limit.min(config.max_actions);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SimulationArgs;

    fn args(limit: Option<usize>) -> ActionsArgs {
        ActionsArgs {
            simulation: SimulationArgs::default(),
            limit,
        }
    }

    #[test]
    fn test_limit_narrows() {
        let config = actions_config(&EngineConfig::default(), &args(Some(3))).unwrap();
        assert_eq!(config.max_actions, 3);
    }

    #[test]
    fn test_limit_cannot_exceed_maximum() {
        let config = actions_config(&EngineConfig::default(), &args(Some(50))).unwrap();
        assert_eq!(config.max_actions, 10);

        let base = EngineConfig {
            max_actions: 4,
            ..Default::default()
        };
        let config = actions_config(&base, &args(Some(8))).unwrap();
        assert_eq!(config.max_actions, 4);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let result = actions_config(&EngineConfig::default(), &args(Some(0)));
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }
}
