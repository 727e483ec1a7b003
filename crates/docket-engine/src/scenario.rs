//! Scenario manager - named weight configurations and their resolution
//!
//! A scenario is stored as free-form text. Resolution parses it into
//! [`ScenarioWeights`]; anything unparseable is treated as "use engine
//! defaults" and logged, never reported as an error.

use crate::EngineError;
use docket_domain::{
    AggregationPolicy, CaseRepository, EntityId, ProbabilityCoefficients, ScenarioModel,
    ScenarioNode,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Name given to the engine-default configuration
pub const ENGINE_DEFAULTS_NAME: &str = "Engine defaults";

/// Parsed weight configuration of a scenario
///
/// Every field is optional; omitted coefficients use the engine defaults.
///
/// ```json
/// {
///   "policy": "and",
///   "claim_policies": { "0190a1b2-...": "or" },
///   "evidence_boost": 0.05,
///   "rule_penalty": 0.06,
///   "contradiction_penalty": 0.08
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioWeights {
    /// Aggregation policy for claims without an override
    pub policy: AggregationPolicy,

    /// Per-claim aggregation overrides
    pub claim_policies: BTreeMap<EntityId, AggregationPolicy>,

    /// Boost per piece of evidence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_boost: Option<f64>,

    /// Penalty per applicable rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_penalty: Option<f64>,

    /// Penalty per contradiction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contradiction_penalty: Option<f64>,
}

impl ScenarioWeights {
    /// Optimistic preset: any proven element carries the claim
    ///
    /// - Policy: OR
    /// - Evidence boost: 0.07
    /// - Rule penalty: 0.04
    /// - Contradiction penalty: 0.06
    pub fn strong_defense() -> Self {
        Self {
            policy: AggregationPolicy::Or,
            claim_policies: BTreeMap::new(),
            evidence_boost: Some(0.07),
            rule_penalty: Some(0.04),
            contradiction_penalty: Some(0.06),
        }
    }

    /// Neutral preset: every element must be proven, default coefficients
    pub fn balanced() -> Self {
        Self {
            policy: AggregationPolicy::And,
            claim_policies: BTreeMap::new(),
            evidence_boost: Some(docket_domain::probability::EVIDENCE_BOOST),
            rule_penalty: Some(docket_domain::probability::RULE_PENALTY),
            contradiction_penalty: Some(docket_domain::probability::CONTRADICTION_PENALTY),
        }
    }

    /// Pessimistic preset: every element must be proven, harsh penalties
    ///
    /// - Policy: AND
    /// - Evidence boost: 0.03
    /// - Rule penalty: 0.09
    /// - Contradiction penalty: 0.12
    pub fn worst_case() -> Self {
        Self {
            policy: AggregationPolicy::And,
            claim_policies: BTreeMap::new(),
            evidence_boost: Some(0.03),
            rule_penalty: Some(0.09),
            contradiction_penalty: Some(0.12),
        }
    }

    /// Parse a stored configuration
    ///
    /// Blank text silently yields the defaults. Malformed text also yields
    /// the defaults, with a warning.
    pub fn parse(config: &str) -> Self {
        if config.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str(config) {
            Ok(weights) => weights,
            Err(e) => {
                tracing::warn!("Malformed scenario configuration, using engine defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Serialize for storage
    pub fn to_config(&self) -> String {
        // Maps keyed by EntityId serialize as strings; this cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Coefficients with defaults filled in and unusable values repaired
    pub fn coefficients(&self) -> ProbabilityCoefficients {
        let defaults = ProbabilityCoefficients::default();
        ProbabilityCoefficients {
            evidence_boost: self.evidence_boost.unwrap_or(defaults.evidence_boost),
            contradiction_penalty: self
                .contradiction_penalty
                .unwrap_or(defaults.contradiction_penalty),
            rule_penalty: self.rule_penalty.unwrap_or(defaults.rule_penalty),
        }
        .sanitized()
    }

    /// Effective policy for a claim
    pub fn policy_for(&self, claim_id: EntityId) -> AggregationPolicy {
        self.claim_policies.get(&claim_id).copied().unwrap_or(self.policy)
    }
}

/// A scenario ready to feed the engine: weights plus per-fact overrides
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedScenario {
    /// Scenario id (None for engine defaults)
    pub id: Option<EntityId>,

    /// Display name
    pub name: String,

    /// Parsed weights
    pub weights: ScenarioWeights,

    /// Overrides keyed by fact id
    pub nodes: HashMap<EntityId, ScenarioNode>,
}

impl ResolvedScenario {
    /// Engine defaults with no overrides
    pub fn engine_defaults() -> Self {
        Self {
            id: None,
            name: ENGINE_DEFAULTS_NAME.to_string(),
            weights: ScenarioWeights::default(),
            nodes: HashMap::new(),
        }
    }

    /// Resolve a stored model with its nodes
    ///
    /// Nodes belonging to other scenarios are ignored.
    pub fn from_model(model: &ScenarioModel, nodes: Vec<ScenarioNode>) -> Self {
        Self {
            id: Some(model.id),
            name: model.name.clone(),
            weights: ScenarioWeights::parse(&model.config),
            nodes: nodes
                .into_iter()
                .filter(|n| n.scenario_id == model.id)
                .map(|n| (n.fact_id, n))
                .collect(),
        }
    }

    /// Replace the per-fact overrides
    pub fn with_nodes(mut self, nodes: impl IntoIterator<Item = ScenarioNode>) -> Self {
        self.nodes = nodes.into_iter().map(|n| (n.fact_id, n)).collect();
        self
    }

    /// Coefficients for the probability model
    pub fn coefficients(&self) -> ProbabilityCoefficients {
        self.weights.coefficients()
    }

    /// Effective policy for a claim
    pub fn policy_for(&self, claim_id: EntityId) -> AggregationPolicy {
        self.weights.policy_for(claim_id)
    }

    /// Override for a fact, if any
    pub fn node(&self, fact_id: EntityId) -> Option<&ScenarioNode> {
        self.nodes.get(&fact_id)
    }
}

/// The named scenarios of one case
///
/// Holds no "current" selection: callers pass the scenario they want to
/// every query, which keeps results a function of (inputs, scenario).
#[derive(Debug, Clone)]
pub struct ScenarioManager {
    case_id: EntityId,
    scenarios: Vec<ScenarioModel>,
}

impl ScenarioManager {
    /// Create a manager over already-loaded scenarios
    pub fn new(case_id: EntityId, scenarios: Vec<ScenarioModel>) -> Self {
        Self { case_id, scenarios }
    }

    /// The three seeded scenarios for a case without any
    pub fn default_scenarios(case_id: EntityId) -> Vec<ScenarioModel> {
        [
            ("Strong defense", ScenarioWeights::strong_defense()),
            ("Balanced", ScenarioWeights::balanced()),
            ("Worst case", ScenarioWeights::worst_case()),
        ]
        .into_iter()
        .map(|(name, weights)| {
            ScenarioModel::new(EntityId::new(), case_id, name, weights.to_config())
        })
        .collect()
    }

    /// Load a case's scenarios, persisting the defaults first if there are none
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the repository fails.
    pub fn load_or_seed<R>(repo: &mut R, case_id: EntityId) -> Result<Self, EngineError>
    where
        R: CaseRepository,
        R::Error: std::fmt::Display,
    {
        let mut scenarios = repo
            .get_scenarios(case_id)
            .map_err(|e| EngineError::Store(e.to_string()))?;

        if scenarios.is_empty() {
            tracing::info!("No scenarios for case {}, seeding defaults", case_id);
            for model in Self::default_scenarios(case_id) {
                repo.save_scenario(model.clone())
                    .map_err(|e| EngineError::Store(e.to_string()))?;
                scenarios.push(model);
            }
        }

        Ok(Self::new(case_id, scenarios))
    }

    /// Case these scenarios belong to
    pub fn case_id(&self) -> EntityId {
        self.case_id
    }

    /// All scenarios, in store order
    pub fn scenarios(&self) -> &[ScenarioModel] {
        &self.scenarios
    }

    /// Find a scenario by id
    pub fn find(&self, scenario_id: EntityId) -> Option<&ScenarioModel> {
        self.scenarios.iter().find(|s| s.id == scenario_id)
    }

    /// Find a scenario by name, case-insensitively
    pub fn find_by_name(&self, name: &str) -> Option<&ScenarioModel> {
        self.scenarios.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Resolve a scenario with the given nodes
    ///
    /// `None` or an unknown id resolves to the engine defaults.
    pub fn resolve(
        &self,
        scenario_id: Option<EntityId>,
        nodes: Vec<ScenarioNode>,
    ) -> ResolvedScenario {
        match scenario_id.and_then(|id| self.find(id)) {
            Some(model) => ResolvedScenario::from_model(model, nodes),
            None => {
                if let Some(id) = scenario_id {
                    tracing::warn!("Unknown scenario {}, using engine defaults", id);
                }
                ResolvedScenario::engine_defaults()
            }
        }
    }

    /// Resolve a scenario, loading its nodes from the repository
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the repository fails.
    pub fn resolve_from<R>(
        &self,
        repo: &R,
        scenario_id: Option<EntityId>,
    ) -> Result<ResolvedScenario, EngineError>
    where
        R: CaseRepository,
        R::Error: std::fmt::Display,
    {
        let nodes = match scenario_id.and_then(|id| self.find(id)) {
            Some(model) => repo
                .get_scenario_nodes(model.id)
                .map_err(|e| EngineError::Store(e.to_string()))?,
            None => Vec::new(),
        };
        Ok(self.resolve(scenario_id, nodes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let claim = EntityId::from_value(5);
        let json = format!(
            concat!(
                r#"{{"policy":"or","claim_policies":{{"{}":"and"}},"#,
                r#""evidence_boost":0.1,"rule_penalty":0.02,"contradiction_penalty":0.2}}"#,
            ),
            claim
        );
        let weights = ScenarioWeights::parse(&json);

        assert_eq!(weights.policy, AggregationPolicy::Or);
        assert_eq!(weights.policy_for(claim), AggregationPolicy::And);
        assert_eq!(weights.policy_for(EntityId::from_value(6)), AggregationPolicy::Or);
        let c = weights.coefficients();
        assert_eq!(c.evidence_boost, 0.1);
        assert_eq!(c.rule_penalty, 0.02);
        assert_eq!(c.contradiction_penalty, 0.2);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let weights = ScenarioWeights::parse(r#"{"rule_penalty": 0.1}"#);
        let c = weights.coefficients();
        assert_eq!(weights.policy, AggregationPolicy::And);
        assert_eq!(c.rule_penalty, 0.1);
        assert_eq!(c.evidence_boost, 0.05);
        assert_eq!(c.contradiction_penalty, 0.08);
    }

    #[test]
    fn test_malformed_config_falls_back() {
        assert_eq!(ScenarioWeights::parse("{not json"), ScenarioWeights::default());
        assert_eq!(ScenarioWeights::parse(r#"{"policy":"xor"}"#), ScenarioWeights::default());
        assert_eq!(ScenarioWeights::parse(""), ScenarioWeights::default());
        assert_eq!(ScenarioWeights::parse("[1,2,3]"), ScenarioWeights::default());
    }

    #[test]
    fn test_negative_coefficients_repaired() {
        let weights = ScenarioWeights::parse(r#"{"evidence_boost": -0.5}"#);
        assert_eq!(weights.coefficients().evidence_boost, 0.0);
    }

    #[test]
    fn test_presets_round_trip_through_config() {
        for weights in [
            ScenarioWeights::strong_defense(),
            ScenarioWeights::balanced(),
            ScenarioWeights::worst_case(),
        ] {
            assert_eq!(ScenarioWeights::parse(&weights.to_config()), weights);
        }
    }

    #[test]
    fn test_default_scenarios() {
        let case = EntityId::from_value(1);
        let defaults = ScenarioManager::default_scenarios(case);
        let names: Vec<&str> = defaults.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Strong defense", "Balanced", "Worst case"]);
        assert!(defaults.iter().all(|s| s.case_id == case));

        let manager = ScenarioManager::new(case, defaults);
        let worst = manager.find_by_name("worst CASE").unwrap();
        let resolved = manager.resolve(Some(worst.id), Vec::new());
        assert_eq!(resolved.weights, ScenarioWeights::worst_case());
    }

    #[test]
    fn test_resolve_unknown_is_engine_defaults() {
        let manager = ScenarioManager::new(EntityId::from_value(1), Vec::new());
        let resolved = manager.resolve(Some(EntityId::from_value(77)), Vec::new());
        assert_eq!(resolved, ResolvedScenario::engine_defaults());
        assert_eq!(manager.resolve(None, Vec::new()).name, ENGINE_DEFAULTS_NAME);
    }

    #[test]
    fn test_resolve_filters_foreign_nodes() {
        let case = EntityId::from_value(1);
        let model = ScenarioModel::new(EntityId::from_value(2), case, "Custom", "");
        let fact = EntityId::from_value(10);
        let nodes = vec![
            ScenarioNode::new(model.id, fact, 0.1, Some(0.9)),
            ScenarioNode::new(EntityId::from_value(3), EntityId::from_value(11), 0.5, None),
        ];

        let resolved = ResolvedScenario::from_model(&model, nodes);
        assert_eq!(resolved.nodes.len(), 1);
        assert_eq!(resolved.node(fact).map(|n| n.adjustment), Some(0.1));
    }
}
