//! Fact probability model
//!
//! Implements the deterministic base-probability formula that every other
//! computation (driver ranking, Monte Carlo sampling, counterfactuals) reads:
//!
//! ```text
//! base = clamp(strength/5
//!              + evidence * evidence_boost
//!              + node_adjustment
//!              - contradictions * contradiction_penalty
//!              - rules * rule_penalty, 0.05, 0.98)
//! ```

/// Default boost per linked piece of evidence
pub const EVIDENCE_BOOST: f64 = 0.05;

/// Default penalty per contradiction link
pub const CONTRADICTION_PENALTY: f64 = 0.08;

/// Default penalty per applicable rule
pub const RULE_PENALTY: f64 = 0.06;

/// Inclusive probability bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityBounds {
    /// Lowest value a probability may take
    pub floor: f64,
    /// Highest value a probability may take
    pub ceiling: f64,
}

impl ProbabilityBounds {
    /// Bounds applied to deterministic base probabilities
    pub const BASE: ProbabilityBounds = ProbabilityBounds { floor: 0.05, ceiling: 0.98 };

    /// Bounds applied to each noisy sample before aggregation
    pub const SAMPLE: ProbabilityBounds = ProbabilityBounds { floor: 0.02, ceiling: 0.99 };

    /// Create bounds, swapping the ends if given in the wrong order
    pub fn new(floor: f64, ceiling: f64) -> Self {
        if floor <= ceiling {
            Self { floor, ceiling }
        } else {
            Self { floor: ceiling, ceiling: floor }
        }
    }

    /// Clamp a value into the bounds; NaN maps to the floor
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.floor;
        }
        value.clamp(self.floor, self.ceiling)
    }

    /// Check if the bounds contain a value
    pub fn contains(&self, value: f64) -> bool {
        value >= self.floor && value <= self.ceiling
    }
}

/// Weights applied by the formula
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityCoefficients {
    /// Added per piece of evidence
    pub evidence_boost: f64,
    /// Subtracted per contradiction
    pub contradiction_penalty: f64,
    /// Subtracted per applicable rule
    pub rule_penalty: f64,
}

impl Default for ProbabilityCoefficients {
    fn default() -> Self {
        Self {
            evidence_boost: EVIDENCE_BOOST,
            contradiction_penalty: CONTRADICTION_PENALTY,
            rule_penalty: RULE_PENALTY,
        }
    }
}

impl ProbabilityCoefficients {
    /// Replace non-finite coefficients with defaults and negative ones with zero
    ///
    /// Keeps the formula monotonic in the documented direction whatever a
    /// stored scenario contains.
    pub fn sanitized(self) -> Self {
        fn fix(value: f64, default: f64) -> f64 {
            if value.is_finite() {
                value.max(0.0)
            } else {
                default
            }
        }

        Self {
            evidence_boost: fix(self.evidence_boost, EVIDENCE_BOOST),
            contradiction_penalty: fix(self.contradiction_penalty, CONTRADICTION_PENALTY),
            rule_penalty: fix(self.rule_penalty, RULE_PENALTY),
        }
    }
}

/// Everything the formula needs to know about one fact in one claim context
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FactSignals {
    /// Clamped strength divided by 5
    pub strength_ratio: f64,
    /// Evidence links touching the fact
    pub evidence_count: u32,
    /// Contradiction links touching the fact
    pub contradiction_count: u32,
    /// Rules matching the fact's or claim's tags
    pub rule_count: u32,
    /// Scenario node adjustment (0 when absent)
    pub adjustment: f64,
}

/// Compute the base probability of a fact
///
/// Total: any combination of inputs yields a value inside `bounds`.
pub fn base_probability(
    signals: &FactSignals,
    coefficients: &ProbabilityCoefficients,
    bounds: ProbabilityBounds,
) -> f64 {
    let adjustment = if signals.adjustment.is_finite() { signals.adjustment } else { 0.0 };

    let raw = signals.strength_ratio
        + signals.evidence_count as f64 * coefficients.evidence_boost
        + adjustment
        - signals.contradiction_count as f64 * coefficients.contradiction_penalty
        - signals.rule_count as f64 * coefficients.rule_penalty;

    bounds.clamp(raw)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn coefficients() -> impl Strategy<Value = ProbabilityCoefficients> {
        (0.0f64..0.5, 0.0f64..0.5, 0.0f64..0.5).prop_map(|(e, c, r)| ProbabilityCoefficients {
            evidence_boost: e,
            contradiction_penalty: c,
            rule_penalty: r,
        })
    }

    proptest! {
        /// Property: base probability always lands in [0.05, 0.98]
        #[test]
        fn test_base_in_bounds(
            strength in -10i32..20,
            evidence in 0u32..50,
            contradictions in 0u32..50,
            rules in 0u32..50,
            adjustment in -5.0f64..5.0,
            coefficients in coefficients(),
        ) {
            let s = FactSignals {
                strength_ratio: strength.clamp(1, 5) as f64 / 5.0,
                evidence_count: evidence,
                contradiction_count: contradictions,
                rule_count: rules,
                adjustment,
            };
            let p = base_probability(&s, &coefficients, ProbabilityBounds::BASE);
            prop_assert!(ProbabilityBounds::BASE.contains(p), "{} out of bounds", p);
        }

        /// Property: more evidence never lowers the base probability
        #[test]
        fn test_evidence_monotonic(
            strength in 1i32..=5,
            evidence in 0u32..10,
            contradictions in 0u32..5,
            coefficients in coefficients(),
        ) {
            let mut s = FactSignals {
                strength_ratio: strength as f64 / 5.0,
                evidence_count: evidence,
                contradiction_count: contradictions,
                ..Default::default()
            };
            let before = base_probability(&s, &coefficients, ProbabilityBounds::BASE);
            s.evidence_count += 1;
            prop_assert!(base_probability(&s, &coefficients, ProbabilityBounds::BASE) >= before);
        }

        /// Property: more contradictions or rules never raise the base probability
        #[test]
        fn test_penalties_monotonic(
            strength in 1i32..=5,
            evidence in 0u32..10,
            contradictions in 0u32..5,
            rules in 0u32..5,
            coefficients in coefficients(),
        ) {
            let s = FactSignals {
                strength_ratio: strength as f64 / 5.0,
                evidence_count: evidence,
                contradiction_count: contradictions,
                rule_count: rules,
                adjustment: 0.0,
            };
            let before = base_probability(&s, &coefficients, ProbabilityBounds::BASE);

            let more_contradictions = FactSignals { contradiction_count: contradictions + 1, ..s };
            let more_rules = FactSignals { rule_count: rules + 1, ..s };

            let bounds = ProbabilityBounds::BASE;
            prop_assert!(base_probability(&more_contradictions, &coefficients, bounds) <= before);
            prop_assert!(base_probability(&more_rules, &coefficients, bounds) <= before);
        }
    }
}
