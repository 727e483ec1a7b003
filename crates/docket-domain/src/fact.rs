//! Facts - assertions whose proof moves a claim's chance of success

use crate::{BurdenCategory, EntityId};
use std::collections::BTreeSet;

/// Lowest author-assigned strength
pub const MIN_STRENGTH: i32 = 1;

/// Highest author-assigned strength
pub const MAX_STRENGTH: i32 = 5;

/// An assertion supporting or opposing a claim
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fact {
    /// Unique identifier
    pub id: EntityId,

    /// Case this fact belongs to
    pub case_id: EntityId,

    /// Short title
    pub title: String,

    /// Author-assigned credibility, nominally 1-5
    ///
    /// Stored as entered. Out-of-range values are clamped when read through
    /// [`Fact::effective_strength`].
    pub strength: i32,

    /// Burden-of-proof class
    #[cfg_attr(feature = "serde", serde(default))]
    pub burden: BurdenCategory,

    /// Tags used to match legal rules
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: BTreeSet<String>,
}

impl Fact {
    /// Create a new fact with the ordinary burden and no tags
    pub fn new(id: EntityId, case_id: EntityId, title: impl Into<String>, strength: i32) -> Self {
        Self {
            id,
            case_id,
            title: title.into(),
            strength,
            burden: BurdenCategory::Ordinary,
            tags: BTreeSet::new(),
        }
    }

    /// Set the burden category
    pub fn with_burden(mut self, burden: BurdenCategory) -> Self {
        self.burden = burden;
        self
    }

    /// Attach tags to the fact
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Strength clamped to [1, 5]
    pub fn effective_strength(&self) -> i32 {
        self.strength.clamp(MIN_STRENGTH, MAX_STRENGTH)
    }

    /// Strength as a fraction of the maximum, in [0.2, 1.0]
    pub fn strength_ratio(&self) -> f64 {
        self.effective_strength() as f64 / MAX_STRENGTH as f64
    }
}
