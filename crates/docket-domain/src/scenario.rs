//! Scenario models and per-fact scenario overrides

use crate::EntityId;

/// How the probabilities of a claim's facts combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AggregationPolicy {
    /// Every supporting fact must hold: product of probabilities
    #[default]
    And,

    /// Any one fact suffices: complement of the product of complements
    Or,
}

impl AggregationPolicy {
    /// Get the policy name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationPolicy::And => "and",
            AggregationPolicy::Or => "or",
        }
    }

    /// Parse a policy from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "and" => Some(AggregationPolicy::And),
            "or" => Some(AggregationPolicy::Or),
            _ => None,
        }
    }

    /// Combine per-fact probabilities under this policy
    ///
    /// An empty slice yields the identity of the policy (1.0 for AND, 0.0 for OR);
    /// callers substitute the empty-claim prior before reaching this point.
    pub fn combine(&self, probabilities: &[f64]) -> f64 {
        match self {
            AggregationPolicy::And => probabilities.iter().product(),
            AggregationPolicy::Or => 1.0 - probabilities.iter().map(|p| 1.0 - p).product::<f64>(),
        }
    }
}

impl std::str::FromStr for AggregationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid aggregation policy: {}", s))
    }
}

/// A named, persisted weight configuration
///
/// The configuration body is free-form text owned by the store. The engine
/// interprets it and falls back to its defaults when it cannot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioModel {
    /// Unique identifier
    pub id: EntityId,

    /// Case this scenario belongs to
    pub case_id: EntityId,

    /// Display name
    pub name: String,

    /// Serialized weight configuration
    #[cfg_attr(feature = "serde", serde(default))]
    pub config: String,
}

impl ScenarioModel {
    /// Create a new scenario model
    pub fn new(
        id: EntityId,
        case_id: EntityId,
        name: impl Into<String>,
        config: impl Into<String>,
    ) -> Self {
        Self {
            id,
            case_id,
            name: name.into(),
            config: config.into(),
        }
    }
}

/// A per-fact, per-scenario override
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioNode {
    /// Scenario this override belongs to
    pub scenario_id: EntityId,

    /// Fact being adjusted
    pub fact_id: EntityId,

    /// Additive probability adjustment
    #[cfg_attr(feature = "serde", serde(default))]
    pub adjustment: f64,

    /// Confidence in [0, 1]; higher means less sampling noise
    #[cfg_attr(feature = "serde", serde(default))]
    pub confidence: Option<f64>,
}

impl ScenarioNode {
    /// Create a node override
    pub fn new(
        scenario_id: EntityId,
        fact_id: EntityId,
        adjustment: f64,
        confidence: Option<f64>,
    ) -> Self {
        Self {
            scenario_id,
            fact_id,
            adjustment,
            confidence,
        }
    }

    /// Adjustment with non-finite values treated as zero
    pub fn effective_adjustment(&self) -> f64 {
        if self.adjustment.is_finite() {
            self.adjustment
        } else {
            0.0
        }
    }

    /// Confidence clamped to [0, 1], or `default` when absent or not a number
    pub fn effective_confidence(&self, default: f64) -> f64 {
        match self.confidence {
            Some(c) if !c.is_nan() => c.clamp(0.0, 1.0),
            _ => default.clamp(0.0, 1.0),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: adding a fact never raises an AND aggregate
        #[test]
        fn test_and_non_increasing(
            probs in prop::collection::vec(0.02f64..0.99, 1..8),
            extra in 0.02f64..0.99,
        ) {
            let before = AggregationPolicy::And.combine(&probs);
            let mut more = probs.clone();
            more.push(extra);
            prop_assert!(AggregationPolicy::And.combine(&more) <= before);
        }

        /// Property: adding a fact never lowers an OR aggregate
        #[test]
        fn test_or_non_decreasing(
            probs in prop::collection::vec(0.02f64..0.99, 1..8),
            extra in 0.02f64..0.99,
        ) {
            let before = AggregationPolicy::Or.combine(&probs);
            let mut more = probs.clone();
            more.push(extra);
            prop_assert!(AggregationPolicy::Or.combine(&more) >= before);
        }
    }
}
