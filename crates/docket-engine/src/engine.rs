//! Query surface: per-claim results, coverage, and ranked actions for one case

use crate::aggregator::{MonteCarlo, Overrides, ScenarioReport};
use crate::optimizer::{ActionCandidate, ActionOptimizer, ActionRanking};
use crate::sampler::resolve_seed;
use crate::{
    CancelToken, CaseSnapshot, EngineConfig, EngineError, EngineMetrics, RelationIndex,
    ResolvedScenario,
};
use docket_domain::{coverage_score, is_missing_support, CaseRepository, EntityId};
use serde::Serialize;
use std::sync::Arc;

/// Coverage of one fact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageEntry {
    /// Fact id
    pub fact_id: EntityId,
    /// Fact title
    pub title: String,
    /// Score in [0, 1]
    pub coverage_score: f64,
    /// Evidence links counted
    pub evidence_count: u32,
    /// Contradiction links counted
    pub contradiction_count: u32,
    /// Score below the missing-support threshold
    pub missing_support: bool,
}

/// Everything the presentation layer shows for one case and scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseAnalysis {
    /// Request generation that produced this analysis (0 outside the worker)
    pub generation: u64,
    /// Scenario outcome
    pub report: ScenarioReport,
    /// Coverage per fact
    pub coverage: Vec<CoverageEntry>,
    /// Ranked actions
    pub actions: Vec<ActionCandidate>,
}

/// Scenario outcome engine bound to one case snapshot
///
/// Each query takes the scenario explicitly; the engine holds no selection
/// state. The relation index is built once at construction.
///
/// # Examples
///
/// ```
/// use docket_domain::{ClaimLineItem, EntityId};
/// use docket_engine::{
///     CancelToken, CaseEngine, CaseSnapshot, EngineConfig, Overrides, ResolvedScenario,
/// };
///
/// let case_id = EntityId::new();
/// let mut snapshot = CaseSnapshot::new(case_id);
/// snapshot.claims.push(ClaimLineItem::new(EntityId::new(), case_id, "Unpaid wages", 100_000));
///
/// let mut engine = CaseEngine::new(snapshot, EngineConfig::default().with_seed(7));
/// let scenario = ResolvedScenario::engine_defaults();
/// let report = engine
///     .compute_scenario(&scenario, &Overrides::none(), &CancelToken::new())
///     .unwrap();
///
/// // A claim without facts reports the empty-claim prior
/// assert_eq!(report.total_expected_value, 12_000);
/// ```
pub struct CaseEngine {
    snapshot: Arc<CaseSnapshot>,
    index: RelationIndex,
    config: EngineConfig,
    metrics: EngineMetrics,
}

impl CaseEngine {
    /// Create an engine over an owned snapshot
    pub fn new(snapshot: CaseSnapshot, config: EngineConfig) -> Self {
        Self::from_shared(Arc::new(snapshot), config)
    }

    /// Create an engine over a shared snapshot
    pub fn from_shared(snapshot: Arc<CaseSnapshot>, config: EngineConfig) -> Self {
        let index = RelationIndex::build(&snapshot);
        Self {
            snapshot,
            index,
            config,
            metrics: EngineMetrics::new(),
        }
    }

    /// Load a case from a repository and build an engine over it
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the repository fails.
    pub fn load<R>(repo: &R, case_id: EntityId, config: EngineConfig) -> Result<Self, EngineError>
    where
        R: CaseRepository,
        R::Error: std::fmt::Display,
    {
        Ok(Self::new(CaseSnapshot::load(repo, case_id)?, config))
    }

    /// Snapshot the engine reads
    pub fn snapshot(&self) -> &CaseSnapshot {
        &self.snapshot
    }

    /// Relation index built from the snapshot
    pub fn index(&self) -> &RelationIndex {
        &self.index
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Counters accumulated by this engine
    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Run a scenario with optional counterfactual overrides
    ///
    /// Uses the configured seed, or a fresh one when none is set.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Cancelled`] if `cancel` fires mid-run.
    pub fn compute_scenario(
        &mut self,
        scenario: &ResolvedScenario,
        overrides: &Overrides,
        cancel: &CancelToken,
    ) -> Result<ScenarioReport, EngineError> {
        let seed = resolve_seed(self.config.seed);
        self.compute_scenario_seeded(scenario, overrides, seed, cancel)
    }

    /// Run a scenario with an explicit seed
    pub fn compute_scenario_seeded(
        &mut self,
        scenario: &ResolvedScenario,
        overrides: &Overrides,
        seed: u64,
        cancel: &CancelToken,
    ) -> Result<ScenarioReport, EngineError> {
        let result = MonteCarlo::new(&self.snapshot, &self.index, &self.config)
            .run(scenario, overrides, seed, cancel);
        match &result {
            Ok(report) => self.metrics.record_run(report.draws()),
            Err(EngineError::Cancelled) => self.metrics.record_cancellation(),
            Err(_) => {}
        }
        result
    }

    /// Coverage score of every fact, in snapshot order
    pub fn compute_coverage(&self) -> Vec<CoverageEntry> {
        self.snapshot
            .facts
            .iter()
            .map(|fact| {
                let evidence_count = self.index.evidence_count(fact.id);
                let contradiction_count = self.index.contradiction_count(fact.id);
                let score = coverage_score(fact, evidence_count, contradiction_count);
                CoverageEntry {
                    fact_id: fact.id,
                    title: fact.title.clone(),
                    coverage_score: score,
                    evidence_count,
                    contradiction_count,
                    missing_support: is_missing_support(
                        score,
                        self.config.missing_support_threshold,
                    ),
                }
            })
            .collect()
    }

    /// Facts flagged as missing support, weakest first
    pub fn missing_support(&self) -> Vec<CoverageEntry> {
        let mut flagged: Vec<CoverageEntry> = self
            .compute_coverage()
            .into_iter()
            .filter(|c| c.missing_support)
            .collect();
        flagged.sort_by(|a, b| {
            a.coverage_score
                .total_cmp(&b.coverage_score)
                .then_with(|| a.fact_id.cmp(&b.fact_id))
        });
        flagged
    }

    /// Ranked next actions, at most `max_actions`, highest ROI first
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Cancelled`] if `cancel` fires.
    pub fn compute_action_candidates(
        &mut self,
        scenario: &ResolvedScenario,
        cancel: &CancelToken,
    ) -> Result<Vec<ActionCandidate>, EngineError> {
        let seed = resolve_seed(self.config.seed);
        self.compute_action_candidates_seeded(scenario, seed, cancel)
    }

    /// Ranked next actions with an explicit seed
    pub fn compute_action_candidates_seeded(
        &mut self,
        scenario: &ResolvedScenario,
        seed: u64,
        cancel: &CancelToken,
    ) -> Result<Vec<ActionCandidate>, EngineError> {
        let optimizer = ActionOptimizer::new(&self.snapshot, &self.index, &self.config);
        let ranking = optimizer.rank(scenario, seed, cancel);
        self.record_ranking(ranking)
    }

    fn record_ranking(
        &mut self,
        ranking: Result<ActionRanking, EngineError>,
    ) -> Result<Vec<ActionCandidate>, EngineError> {
        match ranking {
            Ok(ranking) => {
                self.metrics.record_runs(ranking.runs, ranking.draws);
                self.metrics.record_candidates(ranking.evaluated, ranking.discarded);
                Ok(ranking.candidates)
            }
            Err(e) => {
                if matches!(e, EngineError::Cancelled) {
                    self.metrics.record_cancellation();
                }
                Err(e)
            }
        }
    }

    /// Scenario outcome, coverage, and actions under a single seed
    ///
    /// The scenario report doubles as the baseline the actions are ranked
    /// against.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Cancelled`] if `cancel` fires.
    pub fn analyze(
        &mut self,
        scenario: &ResolvedScenario,
        cancel: &CancelToken,
    ) -> Result<CaseAnalysis, EngineError> {
        let seed = resolve_seed(self.config.seed);
        let report = self.compute_scenario_seeded(scenario, &Overrides::none(), seed, cancel)?;
        let coverage = self.compute_coverage();
        let ranking = ActionOptimizer::new(&self.snapshot, &self.index, &self.config)
            .rank_against(scenario, &report, cancel);
        let actions = self.record_ranking(ranking)?;
        self.metrics.record_analysis();

        tracing::info!(
            "Analyzed case {} under '{}': exposure {}, {} actions",
            self.snapshot.case_id,
            scenario.name,
            report.total_expected_value,
            actions.len()
        );

        Ok(CaseAnalysis {
            generation: 0,
            report,
            coverage,
            actions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_domain::{BurdenCategory, ClaimLineItem, EntityRef, Fact, Link, LinkRole};

    fn id(v: u128) -> EntityId {
        EntityId::from_value(v)
    }

    fn link(v: u128, from: EntityRef, to: EntityRef, role: LinkRole) -> Link {
        Link::new(id(v), from, to, role)
    }

    fn snapshot() -> CaseSnapshot {
        let case = id(1);
        let mut s = CaseSnapshot::new(case);
        s.claims.push(ClaimLineItem::new(id(100), case, "Wages", 50_000));
        s.facts.push(
            Fact::new(id(200), case, "Contract signed", 5).with_burden(BurdenCategory::Shifted),
        );
        s.facts.push(Fact::new(id(201), case, "Verbal promise", 1));
        s.links = vec![
            link(300, EntityRef::claim(id(100)), EntityRef::fact(id(200)), LinkRole::Evidence),
            link(301, EntityRef::fact(id(200)), EntityRef::fact(id(201)), LinkRole::Evidence),
            link(302, EntityRef::fact(id(201)), EntityRef::fact(id(200)), LinkRole::Contradicts),
        ];
        s
    }

    #[test]
    fn test_coverage_entries() {
        let engine = CaseEngine::new(snapshot(), EngineConfig::default());
        let coverage = engine.compute_coverage();

        assert_eq!(coverage.len(), 2);
        // fact 200: 1 evidence / target 2 * 0.7 + 1.0 * 0.3 - 0.1 = 0.55
        assert_eq!(coverage[0].evidence_count, 1);
        assert_eq!(coverage[0].contradiction_count, 1);
        assert!((coverage[0].coverage_score - 0.55).abs() < 1e-9);
        assert!(!coverage[0].missing_support);
        // fact 201: 1 / 3 * 0.7 + 0.2 * 0.3 - 0.1 ~= 0.193
        assert!(coverage[1].missing_support);
    }

    #[test]
    fn test_missing_support_listing() {
        let engine = CaseEngine::new(snapshot(), EngineConfig::default());
        let missing = engine.missing_support();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].fact_id, id(201));
    }

    #[test]
    fn test_analysis_uses_one_seed() {
        let config = EngineConfig::fast().with_seed(3);
        let mut a = CaseEngine::new(snapshot(), config.clone());
        let mut b = CaseEngine::new(snapshot(), config);

        let first = a.analyze(&ResolvedScenario::engine_defaults(), &CancelToken::new()).unwrap();
        let second = b.analyze(&ResolvedScenario::engine_defaults(), &CancelToken::new()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.generation, 0);
        assert_eq!(first.report.seed, 3);
    }

    #[test]
    fn test_metrics_accumulate() {
        let mut engine = CaseEngine::new(snapshot(), EngineConfig::fast().with_seed(1));
        engine.analyze(&ResolvedScenario::engine_defaults(), &CancelToken::new()).unwrap();

        let metrics = engine.metrics();
        assert_eq!(metrics.analyses, 1);
        // both facts are contradicted: the report doubles as baseline, plus two counterfactuals
        assert_eq!(metrics.candidates_evaluated, 2);
        assert_eq!(metrics.scenario_runs, 3);
        assert_eq!(metrics.samples_drawn, 3 * 250);

        engine.reset_metrics();
        assert_eq!(engine.metrics().analyses, 0);
    }

    #[test]
    fn test_analysis_ranks_against_its_report() {
        let config = EngineConfig::fast().with_seed(5);
        let scenario = ResolvedScenario::engine_defaults();
        let cancel = CancelToken::new();

        let mut combined = CaseEngine::new(snapshot(), config.clone());
        let analysis = combined.analyze(&scenario, &cancel).unwrap();

        let mut separate = CaseEngine::new(snapshot(), config);
        let actions = separate.compute_action_candidates_seeded(&scenario, 5, &cancel).unwrap();

        assert_eq!(analysis.actions, actions);
        // report plus analysis costs no more runs than ranking alone
        assert_eq!(separate.metrics().scenario_runs, combined.metrics().scenario_runs);
    }

    #[test]
    fn test_cancellation_recorded() {
        let mut engine = CaseEngine::new(snapshot(), EngineConfig::fast());
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = engine.analyze(&ResolvedScenario::engine_defaults(), &cancel);
        assert!(matches!(result, Err(EngineError::Cancelled)));
        assert_eq!(engine.metrics().cancelled_runs, 1);
    }
}
