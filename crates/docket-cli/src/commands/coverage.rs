//! Coverage command implementation.

use crate::case_file::CaseFile;
use crate::cli::CoverageArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use docket_engine::CaseEngine;

/// Execute the coverage command.
pub fn execute_coverage(
    args: CoverageArgs,
    case: &CaseFile,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let engine = CaseEngine::load(case, case.case_id, config.engine.clone())?;

    let coverage = if args.missing {
        engine.missing_support()
    } else {
        engine.compute_coverage()
    };

    println!("{}", formatter.format_coverage(&coverage)?);

    Ok(())
}
