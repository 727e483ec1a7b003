//! Docket Domain Layer
//!
//! Core domain model for the scenario outcome engine. Defines the case
//! records the engine reads, the deterministic probability and coverage
//! formulas, and the repository trait the engine loads data through.
//!
//! ## Key Concepts
//!
//! - **Claim line-item**: an amount claimed under one legal theory
//! - **Fact**: an assertion with a 1-5 strength and a burden category
//! - **Link**: a pairwise `evidence` or `contradicts` association
//! - **Rule**: a tag-matched legal constraint worth one penalty unit
//! - **Scenario**: a named weight configuration plus per-fact overrides
//!
//! ## Architecture
//!
//! - No external crate dependencies beyond `uuid` (and `serde` behind a feature)
//! - Pure business logic only; no I/O
//! - Storage is reached through [`traits::CaseRepository`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod burden;
pub mod claim;
pub mod coverage;
pub mod document;
pub mod fact;
pub mod id;
pub mod link;
pub mod probability;
pub mod rule;
pub mod scenario;
pub mod traits;

// Re-exports for convenience
pub use burden::BurdenCategory;
pub use claim::{ClaimLineItem, ClaimStatus};
pub use coverage::{coverage_score, is_missing_support, MISSING_SUPPORT_THRESHOLD};
pub use document::{Document, EvidenceSpan};
pub use fact::Fact;
pub use id::EntityId;
pub use link::{EntityKind, EntityRef, Link, LinkRole};
pub use probability::{base_probability, FactSignals, ProbabilityBounds, ProbabilityCoefficients};
pub use rule::Rule;
pub use scenario::{AggregationPolicy, ScenarioModel, ScenarioNode};
pub use traits::CaseRepository;
