//! Action optimizer - counterfactual re-simulation ranked by return on effort
//!
//! Candidate patterns:
//!
//! | Pattern | Trigger | Counterfactual | Ranked by |
//! |---------|---------|----------------|-----------|
//! | Create span | unspanned document | +1 evidence, strongest fact | delta / hours |
//! | Link span | span without outgoing link | +1 evidence, weakest-covered fact | delta / hours |
//! | Minimal fact | claim without facts | claim forced to minimal-fact probability | delta |
//! | Resolve contradiction | contradicted fact | one contradiction fewer | delta / hours |
//!
//! Every candidate reruns the whole scenario with the same seed as the
//! baseline, so deltas reflect the override rather than sampling noise.
//! Nothing is persisted.

use crate::aggregator::{MonteCarlo, Overrides, ScenarioReport};
use crate::config::MAX_ACTIONS;
use crate::{CancelToken, CaseSnapshot, EngineConfig, EngineError, RelationIndex, ResolvedScenario};
use docket_domain::{coverage_score, EntityId, Fact};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Kind of suggested action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Create a span in an unspanned document
    CreateSpan,
    /// Link a dangling span to a fact
    LinkSpan,
    /// Draft a supporting fact for a claim with none
    CreateMinimalFact,
    /// Resolve one contradiction on a fact
    ResolveContradiction,
}

impl ActionKind {
    /// Stable identifier used in candidate ids
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::CreateSpan => "create_span",
            ActionKind::LinkSpan => "link_span",
            ActionKind::CreateMinimalFact => "create_minimal_fact",
            ActionKind::ResolveContradiction => "resolve_contradiction",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proposed next step with its simulated payoff
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionCandidate {
    /// `<kind>:<subject id>`
    pub id: String,
    /// Kind of action
    pub kind: ActionKind,
    /// Short human-readable label
    pub label: String,
    /// Estimated effort in hours
    pub effort_hours: f64,
    /// Change in total expected value (minor units)
    pub expected_delta: i64,
    /// Ranking score
    pub roi: f64,
    /// Why this action is suggested
    pub rationale: String,
    /// Fact the counterfactual touches, if any
    pub target_fact: Option<EntityId>,
    /// Claim the counterfactual touches, if any
    pub target_claim: Option<EntityId>,
}

/// Candidate before simulation
struct Proposal {
    id: String,
    kind: ActionKind,
    label: String,
    effort_hours: f64,
    rationale: String,
    target_fact: Option<EntityId>,
    target_claim: Option<EntityId>,
    overrides: Overrides,
}

/// Ranked actions plus bookkeeping for metrics
#[derive(Debug, Clone, Default)]
pub struct ActionRanking {
    /// Best candidates, highest ROI first
    pub candidates: Vec<ActionCandidate>,
    /// Counterfactual runs performed
    pub evaluated: usize,
    /// Candidates dropped for a non-finite ROI
    pub discarded: usize,
    /// Scenario runs performed, including the baseline when it was computed here
    pub runs: usize,
    /// Per-fact draws across every run performed
    pub draws: u64,
}

/// Ranks counterfactual actions for one case and scenario
pub struct ActionOptimizer<'a> {
    snapshot: &'a CaseSnapshot,
    index: &'a RelationIndex,
    config: &'a EngineConfig,
}

impl<'a> ActionOptimizer<'a> {
    /// Create an optimizer over a snapshot and its index
    pub fn new(
        snapshot: &'a CaseSnapshot,
        index: &'a RelationIndex,
        config: &'a EngineConfig,
    ) -> Self {
        Self { snapshot, index, config }
    }

    /// Fact with the highest base probability outside any claim context
    ///
    /// Ties go to the higher declared strength, then the lower id.
    pub fn strongest_fact(&self, scenario: &ResolvedScenario) -> Option<&'a Fact> {
        let mc = MonteCarlo::new(self.snapshot, self.index, self.config);
        let none = Overrides::none();
        self.snapshot
            .facts
            .iter()
            .map(|f| (f, mc.fact_base(f, None, scenario, &none)))
            .max_by(|(a, pa), (b, pb)| {
                pa.total_cmp(pb)
                    .then_with(|| a.effective_strength().cmp(&b.effective_strength()))
                    .then_with(|| b.id.cmp(&a.id))
            })
            .map(|(f, _)| f)
    }

    /// Fact with the lowest coverage score, ties to the lower id
    pub fn weakest_covered_fact(&self) -> Option<&'a Fact> {
        self.snapshot
            .facts
            .iter()
            .map(|f| {
                let evidence = self.index.evidence_count(f.id);
                let contradictions = self.index.contradiction_count(f.id);
                (f, coverage_score(f, evidence, contradictions))
            })
            .min_by(|(a, sa), (b, sb)| sa.total_cmp(sb).then_with(|| a.id.cmp(&b.id)))
            .map(|(f, _)| f)
    }

    fn proposals(&self, scenario: &ResolvedScenario) -> Vec<Proposal> {
        let effort = &self.config.effort;
        let mut proposals = Vec::new();

        if let Some(strongest) = self.strongest_fact(scenario) {
            let unspanned = self
                .snapshot
                .documents
                .iter()
                .filter(|d| !self.index.document_has_span(d.id));
            for document in unspanned {
                proposals.push(Proposal {
                    id: format!("{}:{}", ActionKind::CreateSpan, document.id),
                    kind: ActionKind::CreateSpan,
                    label: format!("Create a span in \"{}\"", document.title),
                    effort_hours: effort.create_span_hours,
                    rationale: format!(
                        "Document has no evidentiary span; cite it for \"{}\", \
                         currently the strongest fact",
                        strongest.title
                    ),
                    target_fact: Some(strongest.id),
                    target_claim: None,
                    overrides: Overrides::none().add_evidence(strongest.id, 1),
                });
            }
        }

        if let Some(weakest) = self.weakest_covered_fact() {
            let dangling = self
                .snapshot
                .spans
                .iter()
                .filter(|s| !self.index.span_has_outgoing_link(s.id));
            for span in dangling {
                proposals.push(Proposal {
                    id: format!("{}:{}", ActionKind::LinkSpan, span.id),
                    kind: ActionKind::LinkSpan,
                    label: format!("Link span \"{}\"", span.label),
                    effort_hours: effort.link_span_hours,
                    rationale: format!(
                        "Span is not linked to anything; attach it to \"{}\", \
                         the least covered fact",
                        weakest.title
                    ),
                    target_fact: Some(weakest.id),
                    target_claim: None,
                    overrides: Overrides::none().add_evidence(weakest.id, 1),
                });
            }
        }

        let unsupported = self
            .snapshot
            .claims
            .iter()
            .filter(|c| self.index.facts_for_claim(c.id).is_empty());
        for claim in unsupported {
            proposals.push(Proposal {
                id: format!("{}:{}", ActionKind::CreateMinimalFact, claim.id),
                kind: ActionKind::CreateMinimalFact,
                label: format!("Add a supporting fact to \"{}\"", claim.concept),
                effort_hours: effort.minimal_fact_hours,
                rationale: "Claim has no linked facts and falls back to the empty-claim prior"
                    .to_string(),
                target_fact: None,
                target_claim: Some(claim.id),
                overrides: Overrides::none()
                    .force_claim_probability(claim.id, self.config.minimal_fact_probability),
            });
        }

        for fact in self.snapshot.facts.iter() {
            let contradictions = self.index.contradiction_count(fact.id);
            if contradictions == 0 {
                continue;
            }
            proposals.push(Proposal {
                id: format!("{}:{}", ActionKind::ResolveContradiction, fact.id),
                kind: ActionKind::ResolveContradiction,
                label: format!("Resolve a contradiction on \"{}\"", fact.title),
                effort_hours: effort.resolve_contradiction_hours,
                rationale: format!("Fact has {} contradicting link(s)", contradictions),
                target_fact: Some(fact.id),
                target_claim: None,
                overrides: Overrides::none().resolve_contradiction(fact.id),
            });
        }

        proposals
    }

    /// Simulate every candidate against a fresh baseline and return the best ones
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Cancelled`] if `cancel` fires.
    pub fn rank(
        &self,
        scenario: &ResolvedScenario,
        seed: u64,
        cancel: &CancelToken,
    ) -> Result<ActionRanking, EngineError> {
        let mc = MonteCarlo::new(self.snapshot, self.index, self.config);
        let baseline = mc.run(scenario, &Overrides::none(), seed, cancel)?;

        let mut ranking = self.rank_against(scenario, &baseline, cancel)?;
        ranking.runs += 1;
        ranking.draws += baseline.draws();
        Ok(ranking)
    }

    /// Simulate every candidate against an existing baseline report
    ///
    /// Counterfactuals reuse the baseline's seed, and the baseline itself is
    /// not rerun.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Cancelled`] if `cancel` fires.
    pub fn rank_against(
        &self,
        scenario: &ResolvedScenario,
        baseline: &ScenarioReport,
        cancel: &CancelToken,
    ) -> Result<ActionRanking, EngineError> {
        let mc = MonteCarlo::new(self.snapshot, self.index, self.config);
        let seed = baseline.seed;
        let proposals = self.proposals(scenario);
        let mut ranking = ActionRanking::default();
        let baseline = baseline.total_expected_value;

        for proposal in proposals {
            cancel.check()?;
            let report = mc.run(scenario, &proposal.overrides, seed, cancel)?;
            ranking.evaluated += 1;
            ranking.runs += 1;
            ranking.draws += report.draws();
            let total = report.total_expected_value;

            let expected_delta = saturating_delta(total, baseline);
            let roi = match proposal.kind {
                ActionKind::CreateMinimalFact => expected_delta as f64,
                _ => expected_delta as f64 / proposal.effort_hours,
            };

            tracing::debug!("Candidate {}: delta {} roi {}", proposal.id, expected_delta, roi);

            if !roi.is_finite() {
                ranking.discarded += 1;
                continue;
            }

            ranking.candidates.push(ActionCandidate {
                id: proposal.id,
                kind: proposal.kind,
                label: proposal.label,
                effort_hours: proposal.effort_hours,
                expected_delta,
                roi,
                rationale: proposal.rationale,
                target_fact: proposal.target_fact,
                target_claim: proposal.target_claim,
            });
        }

        ranking
            .candidates
            .sort_by(|a, b| match b.roi.total_cmp(&a.roi) {
                Ordering::Equal => a.id.cmp(&b.id),
                other => other,
            });
        ranking.candidates.truncate(self.config.max_actions.min(MAX_ACTIONS));

        Ok(ranking)
    }
}

fn saturating_delta(counterfactual: u64, baseline: u64) -> i64 {
    let delta = counterfactual as i128 - baseline as i128;
    delta.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_domain::{ClaimLineItem, Document, EntityRef, EvidenceSpan, Link, LinkRole};

    fn id(v: u128) -> EntityId {
        EntityId::from_value(v)
    }

    fn link(v: u128, from: EntityRef, to: EntityRef, role: LinkRole) -> Link {
        Link::new(id(v), from, to, role)
    }

    /// Two claims: one backed by two facts (one contradicted), one with no facts.
    /// One unspanned document, one spanned document with a dangling span.
    fn snapshot() -> CaseSnapshot {
        let case = id(1);
        let mut s = CaseSnapshot::new(case);
        s.claims.push(ClaimLineItem::new(id(100), case, "Unpaid wages", 100_000));
        s.claims.push(ClaimLineItem::new(id(101), case, "Penalties", 20_000));
        s.facts.push(Fact::new(id(200), case, "Hours logged", 4));
        s.facts.push(Fact::new(id(201), case, "Manager approval", 2));
        s.documents.push(Document::new(id(300), case, "Payroll export"));
        s.documents.push(Document::new(id(301), case, "Emails"));
        s.spans.push(EvidenceSpan::new(id(400), case, id(301), "Approval thread"));
        s.links = vec![
            link(500, EntityRef::claim(id(100)), EntityRef::fact(id(200)), LinkRole::Evidence),
            link(501, EntityRef::claim(id(100)), EntityRef::fact(id(201)), LinkRole::Evidence),
            link(
                502,
                EntityRef::document(id(301)),
                EntityRef::fact(id(201)),
                LinkRole::Contradicts,
            ),
        ];
        s
    }

    fn rank(snapshot: &CaseSnapshot, config: &EngineConfig) -> ActionRanking {
        let index = RelationIndex::build(snapshot);
        ActionOptimizer::new(snapshot, &index, config)
            .rank(&ResolvedScenario::engine_defaults(), 17, &CancelToken::new())
            .unwrap()
    }

    #[test]
    fn test_every_pattern_proposed() {
        let s = snapshot();
        let ranking = rank(&s, &EngineConfig::fast());
        let ids: Vec<&str> = ranking.candidates.iter().map(|c| c.id.as_str()).collect();

        assert_eq!(ranking.evaluated, 4);
        assert!(ids.contains(&format!("create_span:{}", id(300)).as_str()));
        assert!(ids.contains(&format!("link_span:{}", id(400)).as_str()));
        assert!(ids.contains(&format!("create_minimal_fact:{}", id(101)).as_str()));
        assert!(ids.contains(&format!("resolve_contradiction:{}", id(201)).as_str()));
    }

    #[test]
    fn test_targets() {
        let s = snapshot();
        let index = RelationIndex::build(&s);
        let config = EngineConfig::default();
        let optimizer = ActionOptimizer::new(&s, &index, &config);

        let strongest = optimizer.strongest_fact(&ResolvedScenario::engine_defaults()).unwrap();
        let weakest = optimizer.weakest_covered_fact().unwrap();
        assert_eq!(strongest.id, id(200));
        assert_eq!(weakest.id, id(201));
    }

    #[test]
    fn test_ranking_sorted_and_bounded() {
        let s = snapshot();
        let config = EngineConfig {
            max_actions: 2,
            ..EngineConfig::fast()
        };
        let ranking = rank(&s, &config);

        assert_eq!(ranking.candidates.len(), 2);
        assert!(ranking.candidates[0].roi >= ranking.candidates[1].roi);
        assert!(ranking.candidates.iter().all(|c| c.roi.is_finite()));
    }

    #[test]
    fn test_minimal_fact_ranked_by_raw_delta() {
        let s = snapshot();
        let ranking = rank(&s, &EngineConfig::fast());
        let minimal = ranking
            .candidates
            .iter()
            .find(|c| c.kind == ActionKind::CreateMinimalFact)
            .unwrap();

        // 0.12 -> 0.30 on 20000: 2400 -> 6000
        assert_eq!(minimal.expected_delta, 3600);
        assert_eq!(minimal.roi, 3600.0);
        assert_eq!(minimal.target_claim, Some(id(101)));
    }

    #[test]
    fn test_resolving_contradiction_never_hurts() {
        let s = snapshot();
        let ranking = rank(&s, &EngineConfig::default());
        let resolve = ranking
            .candidates
            .iter()
            .find(|c| c.kind == ActionKind::ResolveContradiction)
            .unwrap();

        assert!(resolve.expected_delta >= 0);
        assert_eq!(resolve.effort_hours, 1.5);
    }

    #[test]
    fn test_empty_case_has_no_actions() {
        let ranking = rank(&CaseSnapshot::new(id(1)), &EngineConfig::fast());
        assert!(ranking.candidates.is_empty());
        assert_eq!(ranking.evaluated, 0);
    }

    #[test]
    fn test_cancelled_ranking() {
        let s = snapshot();
        let index = RelationIndex::build(&s);
        let config = EngineConfig::fast();
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = ActionOptimizer::new(&s, &index, &config).rank(
            &ResolvedScenario::engine_defaults(),
            1,
            &cancel,
        );
        assert!(matches!(result, Err(EngineError::Cancelled)));
    }

    #[test]
    fn test_existing_baseline_not_rerun() {
        let s = snapshot();
        let index = RelationIndex::build(&s);
        let config = EngineConfig::fast();
        let scenario = ResolvedScenario::engine_defaults();
        let cancel = CancelToken::new();
        let optimizer = ActionOptimizer::new(&s, &index, &config);

        let baseline = MonteCarlo::new(&s, &index, &config)
            .run(&scenario, &Overrides::none(), 17, &cancel)
            .unwrap();
        let reused = optimizer.rank_against(&scenario, &baseline, &cancel).unwrap();
        let fresh = optimizer.rank(&scenario, 17, &cancel).unwrap();

        assert_eq!(reused.candidates, fresh.candidates);
        assert_eq!(reused.runs, reused.evaluated);
        assert_eq!(fresh.runs, fresh.evaluated + 1);
        assert_eq!(fresh.draws, reused.draws + baseline.draws());
    }

    #[test]
    fn test_unvalidated_max_actions_still_capped() {
        let case = id(1);
        let mut s = CaseSnapshot::new(case);
        for i in 0..15u128 {
            s.claims.push(ClaimLineItem::new(id(100 + i), case, format!("claim {}", i), 10_000));
        }
        let config = EngineConfig {
            max_actions: 50,
            ..EngineConfig::fast()
        };
        let ranking = rank(&s, &config);

        assert_eq!(ranking.evaluated, 15);
        assert_eq!(ranking.candidates.len(), MAX_ACTIONS);
    }

    #[test]
    fn test_saturating_delta() {
        assert_eq!(saturating_delta(10, 4), 6);
        assert_eq!(saturating_delta(4, 10), -6);
        assert_eq!(saturating_delta(u64::MAX, 0), i64::MAX);
    }
}
