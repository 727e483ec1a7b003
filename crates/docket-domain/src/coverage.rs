//! Coverage scoring - how well a fact is evidentially supported

use crate::Fact;

/// Facts scoring below this are flagged as missing support
pub const MISSING_SUPPORT_THRESHOLD: f64 = 0.35;

/// Weight of the evidence term
const EVIDENCE_WEIGHT: f64 = 0.7;

/// Weight of the strength term
const STRENGTH_WEIGHT: f64 = 0.3;

/// Deduction per contradiction
const CONTRADICTION_DEDUCTION: f64 = 0.1;

/// Compute the coverage score of a fact, in [0, 1]
///
/// `(evidence / burden_target) * 0.7 + (strength / 5) * 0.3 - contradictions * 0.1`
pub fn coverage_score(fact: &Fact, evidence_count: u32, contradiction_count: u32) -> f64 {
    let target = fact.burden.target().max(1) as f64;
    let raw = (evidence_count as f64 / target) * EVIDENCE_WEIGHT
        + fact.strength_ratio() * STRENGTH_WEIGHT
        - contradiction_count as f64 * CONTRADICTION_DEDUCTION;

    raw.clamp(0.0, 1.0)
}

/// Whether a coverage score falls below `threshold`
pub fn is_missing_support(score: f64, threshold: f64) -> bool {
    score < threshold
}
