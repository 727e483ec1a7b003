//! Claim line-items - the amounts a case seeks to recover

use crate::EntityId;
use std::collections::BTreeSet;

/// Lifecycle state of a claim line-item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ClaimStatus {
    /// Being prepared, not yet contested
    #[default]
    Open,

    /// Contested by the opposing party
    Disputed,

    /// Resolved by agreement
    Settled,

    /// Withdrawn or rejected
    Dismissed,
}

impl ClaimStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Open => "open",
            ClaimStatus::Disputed => "disputed",
            ClaimStatus::Settled => "settled",
            ClaimStatus::Dismissed => "dismissed",
        }
    }

    /// Parse a status from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "open" => Some(ClaimStatus::Open),
            "disputed" => Some(ClaimStatus::Disputed),
            "settled" => Some(ClaimStatus::Settled),
            "dismissed" => Some(ClaimStatus::Dismissed),
            _ => None,
        }
    }
}

impl std::str::FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid claim status: {}", s))
    }
}

/// An amount owed under one theory of recovery
///
/// Owned by a case and edited by the surrounding CRUD layer; read-only here.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClaimLineItem {
    /// Unique identifier
    pub id: EntityId,

    /// Case this line-item belongs to
    pub case_id: EntityId,

    /// Concept label (e.g. "unpaid overtime")
    pub concept: String,

    /// Amount in minor currency units
    pub amount: u64,

    /// Tags used to match legal rules
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: BTreeSet<String>,

    /// Lifecycle state
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: ClaimStatus,
}

impl ClaimLineItem {
    /// Create a new open claim line-item with no tags
    pub fn new(id: EntityId, case_id: EntityId, concept: impl Into<String>, amount: u64) -> Self {
        Self {
            id,
            case_id,
            concept: concept.into(),
            amount,
            tags: BTreeSet::new(),
            status: ClaimStatus::Open,
        }
    }

    /// Attach tags to the claim
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(ClaimStatus::parse("Disputed"), Some(ClaimStatus::Disputed));
        assert_eq!(ClaimStatus::parse("settled"), Some(ClaimStatus::Settled));
        assert_eq!(ClaimStatus::parse("archived"), None);
        assert!("bogus".parse::<ClaimStatus>().is_err());
    }

    #[test]
    fn test_claim_with_tags() {
        let claim = ClaimLineItem::new(
            EntityId::from_value(1),
            EntityId::from_value(9),
            "Severance",
            500_000,
        )
        .with_tags(["dismissal", "severance"]);

        assert_eq!(claim.status, ClaimStatus::Open);
        assert_eq!(claim.tags.len(), 2);
        assert!(claim.tags.contains("dismissal"));
    }
}
