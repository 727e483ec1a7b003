//! In-memory snapshot of one case's records

use crate::EngineError;
use docket_domain::{
    CaseRepository, ClaimLineItem, Document, EntityId, EntityRef, EvidenceSpan, Fact, Link, Rule,
};
use std::collections::HashSet;

/// Every collection the engine reads for one case, already loaded
///
/// The engine is a pure function of a snapshot plus a scenario. Collections
/// keep the order the store returned them in; claim order fixes the
/// per-claim random streams, so the same snapshot reproduces the same run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseSnapshot {
    /// Case identifier
    pub case_id: EntityId,

    /// Claim line-items
    pub claims: Vec<ClaimLineItem>,

    /// Facts
    pub facts: Vec<Fact>,

    /// Links touching at least one entity of this case
    pub links: Vec<Link>,

    /// Legal rules
    pub rules: Vec<Rule>,

    /// Documents
    pub documents: Vec<Document>,

    /// Evidentiary spans
    pub spans: Vec<EvidenceSpan>,
}

impl CaseSnapshot {
    /// Create an empty snapshot for a case
    pub fn new(case_id: EntityId) -> Self {
        Self {
            case_id,
            ..Default::default()
        }
    }

    /// Fetch every collection of a case from a repository
    ///
    /// The global link set is narrowed to links touching this case; links
    /// whose other endpoint no longer exists are dropped later by the
    /// relation index.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if any repository call fails.
    pub fn load<R>(repo: &R, case_id: EntityId) -> Result<Self, EngineError>
    where
        R: CaseRepository,
        R::Error: std::fmt::Display,
    {
        let store_err = |e: R::Error| EngineError::Store(e.to_string());

        let mut snapshot = Self {
            case_id,
            claims: repo.get_claims(case_id).map_err(store_err)?,
            facts: repo.get_facts(case_id).map_err(store_err)?,
            links: Vec::new(),
            rules: repo.get_rules(case_id).map_err(store_err)?,
            documents: repo.get_documents(case_id).map_err(store_err)?,
            spans: repo.get_spans(case_id).map_err(store_err)?,
        };

        let all_links = repo.get_links().map_err(store_err)?;
        let total = all_links.len();
        let entities = snapshot.entity_refs();
        snapshot.links = all_links
            .into_iter()
            .filter(|link| entities.contains(&link.from) || entities.contains(&link.to))
            .collect();

        tracing::debug!(
            "Loaded case {}: {} claims, {} facts, {}/{} links, {} rules, {} documents, {} spans",
            case_id,
            snapshot.claims.len(),
            snapshot.facts.len(),
            snapshot.links.len(),
            total,
            snapshot.rules.len(),
            snapshot.documents.len(),
            snapshot.spans.len()
        );

        Ok(snapshot)
    }

    /// Every entity of the case as a link endpoint
    pub fn entity_refs(&self) -> HashSet<EntityRef> {
        let claims = self.claims.iter().map(|c| EntityRef::claim(c.id));
        let facts = self.facts.iter().map(|f| EntityRef::fact(f.id));
        let spans = self.spans.iter().map(|s| EntityRef::span(s.id));
        let documents = self.documents.iter().map(|d| EntityRef::document(d.id));
        claims.chain(facts).chain(spans).chain(documents).collect()
    }

    /// Look up a claim line-item
    pub fn claim(&self, id: EntityId) -> Option<&ClaimLineItem> {
        self.claims.iter().find(|c| c.id == id)
    }

    /// Look up a fact
    pub fn fact(&self, id: EntityId) -> Option<&Fact> {
        self.facts.iter().find(|f| f.id == id)
    }
}
