//! Docket Engine
//!
//! Scenario outcome engine: turns a case's claims, facts, evidence links,
//! contradictions and legal rules into a probabilistic estimate of monetary
//! exposure per claim line-item, plus a ranked list of next actions.
//!
//! # Overview
//!
//! Data flows one way through the engine:
//! - **Relation index**: claim→fact, fact→evidence/contradiction, fact→rule lookups
//! - **Fact probability model**: deterministic base probability per fact
//! - **Monte Carlo aggregator**: noisy draws combined per claim under AND/OR
//! - **Scenario manager**: named weight sets, resolved per query
//! - **Action optimizer**: counterfactual reruns ranked by return on effort
//! - **Query surface**: [`CaseEngine`] and the background [`RecomputeWorker`]
//!
//! Missing or malformed case data never produces an error. Dangling links are
//! skipped, numbers are clamped, and an unreadable scenario falls back to the
//! engine defaults.
//!
//! # Usage
//!
//! ## One-off Analysis
//!
//! ```no_run
//! use docket_engine::{CancelToken, CaseEngine, EngineConfig, ScenarioManager};
//! # use docket_domain::{CaseRepository, EntityId};
//! # fn run<R>(repo: &mut R, case_id: EntityId) -> Result<(), Box<dyn std::error::Error>>
//! # where
//! #     R: CaseRepository,
//! #     R::Error: std::fmt::Display,
//! # {
//! let scenarios = ScenarioManager::load_or_seed(repo, case_id)?;
//! let balanced = scenarios.find_by_name("Balanced").map(|s| s.id);
//! let scenario = scenarios.resolve_from(repo, balanced)?;
//!
//! let mut engine = CaseEngine::load(repo, case_id, EngineConfig::default())?;
//! let analysis = engine.analyze(&scenario, &CancelToken::new())?;
//!
//! println!("Exposure: {}", analysis.report.total_expected_value);
//! for action in &analysis.actions {
//!     println!("{} (ROI {:.1})", action.label, action.roi);
//! }
//! println!("\n{}", engine.metrics().summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration Presets
//!
//! ```
//! use docket_engine::EngineConfig;
//!
//! // Default: 2000 draws per claim
//! let config = EngineConfig::default();
//!
//! // Fast: fewer draws for interactive recomputation
//! let config = EngineConfig::fast();
//!
//! // Precise: more draws for reports
//! let config = EngineConfig::precise();
//! ```
//!
//! # Configuration
//!
//! The engine can be configured via TOML:
//!
//! ```toml
//! samples = 2000
//! seed = 42
//! empty_claim_prior = 0.12
//! noise_scale = 0.12
//! default_confidence = 0.7
//! max_actions = 10
//!
//! [effort]
//! create_span_hours = 0.5
//! link_span_hours = 0.25
//! resolve_contradiction_hours = 1.5
//! ```

#![warn(missing_docs)]

mod aggregator;
mod cancel;
mod config;
mod engine;
mod error;
mod index;
mod metrics;
mod optimizer;
pub mod sampler;
mod scenario;
mod snapshot;
mod worker;

pub use aggregator::{expected_value, ClaimOutcome, Driver, MonteCarlo, Overrides, ScenarioReport};
pub use cancel::CancelToken;
pub use config::{ActionEffort, EngineConfig, MAX_ACTIONS};
pub use engine::{CaseAnalysis, CaseEngine, CoverageEntry};
pub use error::EngineError;
pub use index::{FactLinks, RelationIndex};
pub use metrics::EngineMetrics;
pub use optimizer::{ActionCandidate, ActionKind, ActionOptimizer, ActionRanking};
pub use scenario::{ResolvedScenario, ScenarioManager, ScenarioWeights, ENGINE_DEFAULTS_NAME};
pub use snapshot::CaseSnapshot;
pub use worker::{AnalysisSlot, RecomputeRequest, RecomputeWorker};
