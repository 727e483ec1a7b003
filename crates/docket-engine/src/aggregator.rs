//! Monte Carlo aggregation of fact probabilities into claim outcomes
//!
//! For each claim:
//! 1. Compute every linked fact's deterministic base probability
//! 2. Draw `samples` rounds of noisy per-fact probabilities
//! 3. Combine each round under the claim's AND/OR policy
//! 4. Report the mean, 10th and 90th percentiles, and expected value
//!
//! Claims without facts skip sampling and report the empty-claim prior.

use crate::sampler::{claim_stream, gaussian, SampleSummary};
use crate::{CancelToken, CaseSnapshot, EngineConfig, EngineError, RelationIndex, ResolvedScenario};
use docket_domain::{
    base_probability, AggregationPolicy, ClaimLineItem, EntityId, Fact, FactSignals,
};
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;

/// Counterfactual adjustments applied on top of the stored case data
///
/// Counts never drop below zero however large a negative delta is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    /// Extra (or fewer) evidence links per fact
    pub evidence_delta: HashMap<EntityId, i64>,

    /// Extra (or fewer) contradiction links per fact
    pub contradiction_delta: HashMap<EntityId, i64>,

    /// Aggregated probability forced onto a claim, bypassing sampling
    pub forced_probability: HashMap<EntityId, f64>,
}

impl Overrides {
    /// No overrides
    pub fn none() -> Self {
        Self::default()
    }

    /// Pretend a fact has `count` more evidence links
    pub fn add_evidence(mut self, fact_id: EntityId, count: i64) -> Self {
        let delta = self.evidence_delta.entry(fact_id).or_insert(0);
        *delta = delta.saturating_add(count);
        self
    }

    /// Pretend one contradiction on a fact was resolved
    pub fn resolve_contradiction(mut self, fact_id: EntityId) -> Self {
        let delta = self.contradiction_delta.entry(fact_id).or_insert(0);
        *delta = delta.saturating_sub(1);
        self
    }

    /// Force a claim's aggregated probability
    pub fn force_claim_probability(mut self, claim_id: EntityId, probability: f64) -> Self {
        self.forced_probability.insert(claim_id, probability);
        self
    }

    /// Whether nothing is overridden
    pub fn is_empty(&self) -> bool {
        self.evidence_delta.is_empty()
            && self.contradiction_delta.is_empty()
            && self.forced_probability.is_empty()
    }

    fn adjust(count: u32, delta: Option<&i64>) -> u32 {
        let adjusted = i64::from(count).saturating_add(delta.copied().unwrap_or(0));
        adjusted.clamp(0, u32::MAX as i64) as u32
    }
}

/// A fact ranked among a claim's drivers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Driver {
    /// Fact id
    pub fact_id: EntityId,
    /// Fact title
    pub title: String,
    /// Deterministic base probability
    pub base_probability: f64,
}

/// Simulated outcome of one claim line-item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimOutcome {
    /// Claim id
    pub claim_id: EntityId,
    /// Claim concept label
    pub concept: String,
    /// Claimed amount (minor units)
    pub amount: u64,
    /// Policy used to combine facts
    pub policy: AggregationPolicy,
    /// Number of linked facts
    pub fact_count: usize,
    /// Mean aggregated probability
    pub mean: f64,
    /// 10th percentile
    pub p10: f64,
    /// 90th percentile
    pub p90: f64,
    /// `round(mean * amount)`
    pub expected_value: u64,
    /// Strongest facts by base probability
    pub top_drivers: Vec<Driver>,
    /// Whether the probability was forced rather than simulated
    pub forced: bool,
}

/// Result of running one scenario over a case
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    /// Scenario id (None for engine defaults)
    pub scenario_id: Option<EntityId>,
    /// Scenario name
    pub scenario_name: String,
    /// Seed the run used
    pub seed: u64,
    /// Draws per claim
    pub samples: usize,
    /// One entry per claim, in snapshot order
    pub per_claim: Vec<ClaimOutcome>,
    /// Sum of per-claim expected values
    pub total_expected_value: u64,
}

impl ScenarioReport {
    /// Outcome of a specific claim
    pub fn claim(&self, claim_id: EntityId) -> Option<&ClaimOutcome> {
        self.per_claim.iter().find(|c| c.claim_id == claim_id)
    }

    /// Total number of per-fact draws performed
    pub fn draws(&self) -> u64 {
        self.per_claim
            .iter()
            .filter(|c| !c.forced)
            .map(|c| (c.fact_count * self.samples) as u64)
            .sum()
    }
}

/// `round(probability * amount)` in minor units
pub fn expected_value(probability: f64, amount: u64) -> u64 {
    (probability.clamp(0.0, 1.0) * amount as f64).round() as u64
}

/// Monte Carlo aggregator bound to one case
pub struct MonteCarlo<'a> {
    snapshot: &'a CaseSnapshot,
    index: &'a RelationIndex,
    config: &'a EngineConfig,
}

impl<'a> MonteCarlo<'a> {
    /// Create an aggregator over a snapshot and its index
    pub fn new(
        snapshot: &'a CaseSnapshot,
        index: &'a RelationIndex,
        config: &'a EngineConfig,
    ) -> Self {
        Self { snapshot, index, config }
    }

    /// Deterministic base probability of a fact
    ///
    /// With a claim, rules matching the claim's tags also apply.
    pub fn fact_base(
        &self,
        fact: &Fact,
        claim_id: Option<EntityId>,
        scenario: &ResolvedScenario,
        overrides: &Overrides,
    ) -> f64 {
        let signals = FactSignals {
            strength_ratio: fact.strength_ratio(),
            evidence_count: Overrides::adjust(
                self.index.evidence_count(fact.id),
                overrides.evidence_delta.get(&fact.id),
            ),
            contradiction_count: Overrides::adjust(
                self.index.contradiction_count(fact.id),
                overrides.contradiction_delta.get(&fact.id),
            ),
            rule_count: self.index.applicable_rule_count(fact.id, claim_id),
            adjustment: scenario.node(fact.id).map_or(0.0, |n| n.effective_adjustment()),
        };
        base_probability(&signals, &scenario.coefficients(), self.config.base_bounds())
    }

    /// Run the scenario over every claim
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Cancelled`] if `cancel` fires between claims.
    pub fn run(
        &self,
        scenario: &ResolvedScenario,
        overrides: &Overrides,
        seed: u64,
        cancel: &CancelToken,
    ) -> Result<ScenarioReport, EngineError> {
        let mut per_claim = Vec::with_capacity(self.snapshot.claims.len());

        for (position, claim) in self.snapshot.claims.iter().enumerate() {
            cancel.check()?;
            let mut rng = claim_stream(seed, position);
            per_claim.push(self.evaluate_claim(claim, scenario, overrides, &mut rng));
        }

        let total_expected_value = per_claim
            .iter()
            .fold(0u64, |acc, c| acc.saturating_add(c.expected_value));

        tracing::debug!(
            "Scenario '{}' over {} claims: total expected value {}",
            scenario.name,
            per_claim.len(),
            total_expected_value
        );

        Ok(ScenarioReport {
            scenario_id: scenario.id,
            scenario_name: scenario.name.clone(),
            seed,
            samples: self.config.samples,
            per_claim,
            total_expected_value,
        })
    }

    /// Simulate a single claim with the given random source
    pub fn evaluate_claim<R: Rng + ?Sized>(
        &self,
        claim: &ClaimLineItem,
        scenario: &ResolvedScenario,
        overrides: &Overrides,
        rng: &mut R,
    ) -> ClaimOutcome {
        let policy = scenario.policy_for(claim.id);

        // (fact, base, noise sd), skipping ids with no fact record
        let facts: Vec<(&Fact, f64, f64)> = self
            .index
            .facts_for_claim(claim.id)
            .iter()
            .filter_map(|id| self.snapshot.fact(*id))
            .map(|fact| {
                let base = self.fact_base(fact, Some(claim.id), scenario, overrides);
                let confidence = scenario
                    .node(fact.id)
                    .map_or(self.config.default_confidence.clamp(0.0, 1.0), |n| {
                        n.effective_confidence(self.config.default_confidence)
                    });
                (fact, base, self.config.noise_scale * (1.0 - confidence))
            })
            .collect();

        let top_drivers = self.drivers(&facts);

        let (summary, forced) = if let Some(&p) = overrides.forced_probability.get(&claim.id) {
            (SampleSummary::constant(p.clamp(0.0, 1.0)), true)
        } else if facts.is_empty() {
            (SampleSummary::constant(self.config.empty_claim_prior), false)
        } else {
            (self.sample(&facts, policy, rng), false)
        };

        ClaimOutcome {
            claim_id: claim.id,
            concept: claim.concept.clone(),
            amount: claim.amount,
            policy,
            fact_count: facts.len(),
            mean: summary.mean,
            p10: summary.p10,
            p90: summary.p90,
            expected_value: expected_value(summary.mean, claim.amount),
            top_drivers,
            forced,
        }
    }

    fn sample<R: Rng + ?Sized>(
        &self,
        facts: &[(&Fact, f64, f64)],
        policy: AggregationPolicy,
        rng: &mut R,
    ) -> SampleSummary {
        let bounds = self.config.sample_bounds();
        let samples = self.config.samples.max(1);
        let mut aggregated = Vec::with_capacity(samples);
        let mut draw = vec![0.0; facts.len()];

        for _ in 0..samples {
            for (slot, (_, base, sd)) in draw.iter_mut().zip(facts) {
                *slot = bounds.clamp(base + gaussian(rng) * sd);
            }
            aggregated.push(policy.combine(&draw));
        }

        SampleSummary::from_samples(&mut aggregated)
            .unwrap_or(SampleSummary::constant(self.config.empty_claim_prior))
    }

    fn drivers(&self, facts: &[(&Fact, f64, f64)]) -> Vec<Driver> {
        let mut ranked: Vec<Driver> = facts
            .iter()
            .map(|(fact, base, _)| Driver {
                fact_id: fact.id,
                title: fact.title.clone(),
                base_probability: *base,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.base_probability
                .total_cmp(&a.base_probability)
                .then_with(|| a.fact_id.cmp(&b.fact_id))
        });
        ranked.truncate(self.config.driver_count);
        ranked
    }
}
