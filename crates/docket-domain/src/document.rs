//! Documents and the evidentiary spans cut from them

use crate::EntityId;

/// A document filed or collected for the case
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    /// Unique identifier
    pub id: EntityId,

    /// Case this document belongs to
    pub case_id: EntityId,

    /// Display title
    pub title: String,
}

impl Document {
    /// Create a new document
    pub fn new(id: EntityId, case_id: EntityId, title: impl Into<String>) -> Self {
        Self {
            id,
            case_id,
            title: title.into(),
        }
    }
}

/// A marked passage of a document that can be linked as evidence
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvidenceSpan {
    /// Unique identifier
    pub id: EntityId,

    /// Case this span belongs to
    pub case_id: EntityId,

    /// Document the span was cut from
    pub document_id: EntityId,

    /// Short description of the passage
    pub label: String,
}

impl EvidenceSpan {
    /// Create a new span
    pub fn new(
        id: EntityId,
        case_id: EntityId,
        document_id: EntityId,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id,
            case_id,
            document_id,
            label: label.into(),
        }
    }
}
