//! Links between case entities (pairwise only)

use crate::EntityId;

/// Kind of entity a link endpoint refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EntityKind {
    /// A claim line-item
    Claim,

    /// A fact
    Fact,

    /// An evidentiary span within a document
    Span,

    /// A whole document
    Document,
}

/// One endpoint of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityRef {
    /// What the endpoint is
    pub kind: EntityKind,

    /// Identifier of the endpoint
    pub id: EntityId,
}

impl EntityRef {
    /// Reference a claim line-item
    pub fn claim(id: EntityId) -> Self {
        Self { kind: EntityKind::Claim, id }
    }

    /// Reference a fact
    pub fn fact(id: EntityId) -> Self {
        Self { kind: EntityKind::Fact, id }
    }

    /// Reference an evidentiary span
    pub fn span(id: EntityId) -> Self {
        Self { kind: EntityKind::Span, id }
    }

    /// Reference a document
    pub fn document(id: EntityId) -> Self {
        Self { kind: EntityKind::Document, id }
    }
}

/// Role a link plays in the evidentiary graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LinkRole {
    /// One endpoint supports or evidences the other
    Evidence,

    /// One endpoint contradicts the other
    Contradicts,
}

/// A typed association between two case entities
///
/// Direction is recorded but only matters for "outgoing" checks on spans;
/// the relation index otherwise treats links as undirected.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link {
    /// Unique identifier
    pub id: EntityId,

    /// Source endpoint
    pub from: EntityRef,

    /// Target endpoint
    pub to: EntityRef,

    /// Role of the association
    pub role: LinkRole,
}

impl Link {
    /// Create a new link
    pub fn new(id: EntityId, from: EntityRef, to: EntityRef, role: LinkRole) -> Self {
        Self { id, from, to, role }
    }

    /// The endpoint opposite `this`, if `this` is one of the endpoints
    pub fn other_end(&self, this: EntityRef) -> Option<EntityRef> {
        if self.from == this {
            Some(self.to)
        } else if self.to == this {
            Some(self.from)
        } else {
            None
        }
    }

    /// Whether either endpoint is `entity`
    pub fn touches(&self, entity: EntityRef) -> bool {
        self.from == entity || self.to == entity
    }
}
