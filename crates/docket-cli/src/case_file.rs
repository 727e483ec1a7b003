//! JSON case file: a file-backed case repository.

use crate::error::{CliError, Result};
use docket_domain::{
    CaseRepository, ClaimLineItem, Document, EntityId, EvidenceSpan, Fact, Link, Rule,
    ScenarioModel, ScenarioNode,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Every record of one case, as stored on disk.
///
/// Records belonging to other cases may appear in the file; the repository
/// methods filter by case id the same way a shared store would.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseFile {
    /// Case identifier
    pub case_id: EntityId,

    /// Claim line-items
    #[serde(default)]
    pub claims: Vec<ClaimLineItem>,

    /// Facts
    #[serde(default)]
    pub facts: Vec<Fact>,

    /// Links (global)
    #[serde(default)]
    pub links: Vec<Link>,

    /// Legal rules
    #[serde(default)]
    pub rules: Vec<Rule>,

    /// Documents
    #[serde(default)]
    pub documents: Vec<Document>,

    /// Evidentiary spans
    #[serde(default)]
    pub spans: Vec<EvidenceSpan>,

    /// Scenario models
    #[serde(default)]
    pub scenarios: Vec<ScenarioModel>,

    /// Per-fact scenario overrides
    #[serde(default)]
    pub scenario_nodes: Vec<ScenarioNode>,

    #[serde(skip)]
    dirty: bool,
}

impl CaseFile {
    /// Create an empty case file.
    pub fn new(case_id: EntityId) -> Self {
        Self {
            case_id,
            ..Default::default()
        }
    }

    /// Read a case file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let case: CaseFile = serde_json::from_str(&contents)?;
        tracing::debug!("Read case {} from {}", case.case_id, path.display());
        Ok(case)
    }

    /// Write the case file to disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Write the file back only if a scenario was added since loading.
    ///
    /// Returns whether anything was written.
    pub fn save_if_dirty(&mut self, path: &Path) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.save(path)?;
        self.dirty = false;
        Ok(true)
    }
}

impl CaseRepository for CaseFile {
    type Error = CliError;

    fn get_claims(&self, case_id: EntityId) -> Result<Vec<ClaimLineItem>> {
        Ok(self.claims.iter().filter(|c| c.case_id == case_id).cloned().collect())
    }

    fn get_facts(&self, case_id: EntityId) -> Result<Vec<Fact>> {
        Ok(self.facts.iter().filter(|f| f.case_id == case_id).cloned().collect())
    }

    fn get_links(&self) -> Result<Vec<Link>> {
        Ok(self.links.clone())
    }

    fn get_rules(&self, case_id: EntityId) -> Result<Vec<Rule>> {
        Ok(self.rules.iter().filter(|r| r.case_id == case_id).cloned().collect())
    }

    fn get_documents(&self, case_id: EntityId) -> Result<Vec<Document>> {
        Ok(self.documents.iter().filter(|d| d.case_id == case_id).cloned().collect())
    }

    fn get_spans(&self, case_id: EntityId) -> Result<Vec<EvidenceSpan>> {
        Ok(self.spans.iter().filter(|s| s.case_id == case_id).cloned().collect())
    }

    fn get_scenarios(&self, case_id: EntityId) -> Result<Vec<ScenarioModel>> {
        Ok(self.scenarios.iter().filter(|s| s.case_id == case_id).cloned().collect())
    }

    fn get_scenario_nodes(&self, scenario_id: EntityId) -> Result<Vec<ScenarioNode>> {
        Ok(self
            .scenario_nodes
            .iter()
            .filter(|n| n.scenario_id == scenario_id)
            .cloned()
            .collect())
    }

    fn save_scenario(&mut self, scenario: ScenarioModel) -> Result<()> {
        if scenario.case_id != self.case_id {
            return Err(CliError::InvalidInput(format!(
                "Scenario '{}' belongs to case {}, not {}",
                scenario.name, scenario.case_id, self.case_id
            )));
        }
        self.scenarios.push(scenario);
        self.dirty = true;
        Ok(())
    }
}
