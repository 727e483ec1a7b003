//! Trait definitions for external interactions
//!
//! The engine reads case data through these traits and never owns storage.
//! Implementations live with the application (browser store, JSON files, tests).

use crate::{
    ClaimLineItem, Document, EntityId, EvidenceSpan, Fact, Link, Rule, ScenarioModel, ScenarioNode,
};

/// Read access to one litigation case's records, plus scenario seeding
///
/// Every method is scoped by case except [`CaseRepository::get_links`], which
/// returns the global link set; callers filter it to the case's entities.
pub trait CaseRepository {
    /// Error type for repository operations
    type Error;

    /// Claim line-items of a case
    fn get_claims(&self, case_id: EntityId) -> Result<Vec<ClaimLineItem>, Self::Error>;

    /// Facts of a case
    fn get_facts(&self, case_id: EntityId) -> Result<Vec<Fact>, Self::Error>;

    /// Every link known to the store, across all cases
    fn get_links(&self) -> Result<Vec<Link>, Self::Error>;

    /// Legal rules recorded against a case
    fn get_rules(&self, case_id: EntityId) -> Result<Vec<Rule>, Self::Error>;

    /// Documents of a case
    fn get_documents(&self, case_id: EntityId) -> Result<Vec<Document>, Self::Error>;

    /// Evidentiary spans of a case
    fn get_spans(&self, case_id: EntityId) -> Result<Vec<EvidenceSpan>, Self::Error>;

    /// Scenario models of a case
    fn get_scenarios(&self, case_id: EntityId) -> Result<Vec<ScenarioModel>, Self::Error>;

    /// Per-fact overrides of one scenario
    fn get_scenario_nodes(&self, scenario_id: EntityId) -> Result<Vec<ScenarioNode>, Self::Error>;

    /// Persist a scenario model (used to seed defaults)
    fn save_scenario(&mut self, scenario: ScenarioModel) -> Result<(), Self::Error>;
}
