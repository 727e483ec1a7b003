//! Configuration for engine runs
//!
//! Sampling budget, calibration constants, and action effort estimates.

use crate::EngineError;
use docket_domain::ProbabilityBounds;
use serde::{Deserialize, Serialize};

/// Upper bound on the number of ranked actions any query returns
pub const MAX_ACTIONS: usize = 10;

/// Effort estimates (hours) attached to each kind of suggested action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionEffort {
    /// Cut a span out of an unspanned document and link it to a fact
    pub create_span_hours: f64,

    /// Link an existing span to a fact
    pub link_span_hours: f64,

    /// Draft a minimal supporting fact for an unsupported claim
    ///
    /// Shown to the user only; this action is ranked by its raw delta.
    pub minimal_fact_hours: f64,

    /// Resolve or mark one contradiction
    pub resolve_contradiction_hours: f64,
}

impl Default for ActionEffort {
    fn default() -> Self {
        Self {
            create_span_hours: 0.5,
            link_span_hours: 0.25,
            minimal_fact_hours: 1.0,
            resolve_contradiction_hours: 1.5,
        }
    }
}

/// Configuration for the scenario outcome engine
///
/// # Examples
///
/// ```
/// use docket_engine::EngineConfig;
///
/// // Default configuration (2000 samples per claim)
/// let config = EngineConfig::default();
/// assert_eq!(config.samples, 2000);
///
/// // Quick interactive estimates
/// let config = EngineConfig::fast();
/// assert!(config.samples < 2000);
///
/// // Slower, tighter estimates
/// let config = EngineConfig::precise();
/// assert!(config.samples > 2000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Monte Carlo draws per claim
    pub samples: usize,

    /// Fixed seed for reproducible runs (None = fresh seed per run)
    pub seed: Option<u64>,

    /// Statistic reported for claims without linked facts
    pub empty_claim_prior: f64,

    /// Standard deviation of sampling noise at zero confidence
    pub noise_scale: f64,

    /// Confidence used when a fact has no scenario node
    pub default_confidence: f64,

    /// Lower clamp for base probabilities
    pub base_floor: f64,

    /// Upper clamp for base probabilities
    pub base_ceiling: f64,

    /// Lower clamp for each noisy sample
    pub sample_floor: f64,

    /// Upper clamp for each noisy sample
    pub sample_ceiling: f64,

    /// Number of driver facts recorded per claim
    pub driver_count: usize,

    /// Maximum number of ranked actions returned (1 to [`MAX_ACTIONS`])
    pub max_actions: usize,

    /// Coverage below which a fact is flagged as missing support
    pub missing_support_threshold: f64,

    /// Probability forced onto a claim when simulating a new minimal fact
    pub minimal_fact_probability: f64,

    /// Effort estimates per action kind
    pub effort: ActionEffort,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            samples: 2000,
            seed: None,
            empty_claim_prior: 0.12,
            noise_scale: 0.12,
            default_confidence: 0.70,
            base_floor: ProbabilityBounds::BASE.floor,
            base_ceiling: ProbabilityBounds::BASE.ceiling,
            sample_floor: ProbabilityBounds::SAMPLE.floor,
            sample_ceiling: ProbabilityBounds::SAMPLE.ceiling,
            driver_count: 3,
            max_actions: MAX_ACTIONS,
            missing_support_threshold: docket_domain::MISSING_SUPPORT_THRESHOLD,
            minimal_fact_probability: 0.30,
            effort: ActionEffort::default(),
        }
    }
}

impl EngineConfig {
    /// Fast preset: fewer samples for responsive interactive use
    pub fn fast() -> Self {
        Self {
            samples: 250,
            ..Self::default()
        }
    }

    /// Precise preset: more samples for reports
    pub fn precise() -> Self {
        Self {
            samples: 10_000,
            ..Self::default()
        }
    }

    /// Same configuration with a fixed seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Bounds applied to base probabilities
    pub fn base_bounds(&self) -> ProbabilityBounds {
        ProbabilityBounds::new(self.base_floor, self.base_ceiling)
    }

    /// Bounds applied to sampled probabilities
    pub fn sample_bounds(&self) -> ProbabilityBounds {
        ProbabilityBounds::new(self.sample_floor, self.sample_ceiling)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.samples == 0 {
            return Err(EngineError::Config("samples must be greater than 0".to_string()));
        }
        if !(1..=MAX_ACTIONS).contains(&self.max_actions) {
            return Err(EngineError::Config(format!(
                "max_actions must be between 1 and {}, got {}",
                MAX_ACTIONS, self.max_actions
            )));
        }
        for (name, value) in [
            ("empty_claim_prior", self.empty_claim_prior),
            ("default_confidence", self.default_confidence),
            ("base_floor", self.base_floor),
            ("base_ceiling", self.base_ceiling),
            ("sample_floor", self.sample_floor),
            ("sample_ceiling", self.sample_ceiling),
            ("minimal_fact_probability", self.minimal_fact_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.base_floor > self.base_ceiling || self.sample_floor > self.sample_ceiling {
            return Err(EngineError::Config(
                "probability floors cannot exceed ceilings".to_string(),
            ));
        }
        if !self.noise_scale.is_finite() || self.noise_scale < 0.0 {
            return Err(EngineError::Config(
                "noise_scale must be a non-negative number".to_string(),
            ));
        }
        let effort = &self.effort;
        for (name, hours) in [
            ("create_span_hours", effort.create_span_hours),
            ("link_span_hours", effort.link_span_hours),
            ("minimal_fact_hours", effort.minimal_fact_hours),
            ("resolve_contradiction_hours", effort.resolve_contradiction_hours),
        ] {
            if !hours.is_finite() || hours <= 0.0 {
                return Err(EngineError::Config(format!("{} must be greater than 0", name)));
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, EngineError> {
        toml::from_str(toml_str)
            .map_err(|e| EngineError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self)
            .map_err(|e| EngineError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}
