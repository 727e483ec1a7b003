//! Legal rules - tag-matched constraints that penalize facts

use crate::EntityId;
use std::collections::BTreeSet;

/// A penalty-bearing legal constraint
///
/// A rule has no numeric weight of its own: each rule whose tags intersect a
/// fact's (or its claim's) tags contributes one penalty unit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    /// Unique identifier
    pub id: EntityId,

    /// Case this rule is recorded against
    pub case_id: EntityId,

    /// Citation or short description
    pub title: String,

    /// Tags the rule applies to
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: BTreeSet<String>,
}

impl Rule {
    /// Create a new rule
    pub fn new<I, S>(id: EntityId, case_id: EntityId, title: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            case_id,
            title: title.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the rule shares at least one tag with `tags`
    pub fn matches(&self, tags: &BTreeSet<String>) -> bool {
        !self.tags.is_disjoint(tags)
    }
}
