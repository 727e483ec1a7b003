//! Scenarios command implementation.

use crate::case_file::CaseFile;
use crate::error::Result;
use crate::output::Formatter;
use docket_engine::ScenarioManager;
use std::path::Path;

/// Execute the scenarios command.
pub fn execute_scenarios(case: &mut CaseFile, path: &Path, formatter: &Formatter) -> Result<()> {
    let case_id = case.case_id;
    let manager = ScenarioManager::load_or_seed(case, case_id)?;

    if case.save_if_dirty(path)? {
        eprintln!("{}", formatter.success("Seeded default scenarios"));
    }

    println!("{}", formatter.format_scenarios(manager.scenarios())?);

    Ok(())
}
