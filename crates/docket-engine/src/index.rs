//! Relation index over one case's link graph
//!
//! Built once per snapshot and read by every later stage. Links whose
//! endpoints are missing from the snapshot (deleted entities, other cases)
//! are skipped without complaint.
//!
//! Link interpretation:
//! - `evidence` between a claim and a fact attaches the fact to the claim
//! - `evidence` between a fact and anything other than a claim counts as
//!   evidence for that fact (for both facts when two facts are linked)
//! - `contradicts` counts one contradiction for every fact endpoint
//! - a span has an outgoing link when it is the `from` end of any link

use crate::CaseSnapshot;
use docket_domain::{EntityId, EntityKind, EntityRef, LinkRole};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Evidence and contradiction tallies for one fact
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactLinks {
    /// Number of evidence links
    pub evidence_count: u32,

    /// Number of contradiction links
    pub contradiction_count: u32,

    /// Entities on the other end of the evidence links
    pub evidence: Vec<EntityRef>,
}

/// Lookup structures derived from a [`CaseSnapshot`]
#[derive(Debug, Clone, Default)]
pub struct RelationIndex {
    claim_facts: HashMap<EntityId, Vec<EntityId>>,
    fact_links: HashMap<EntityId, FactLinks>,
    fact_rules: HashMap<EntityId, BTreeSet<EntityId>>,
    claim_rules: HashMap<EntityId, BTreeSet<EntityId>>,
    spans_with_outgoing: HashSet<EntityId>,
    documents_with_spans: HashSet<EntityId>,
    dropped_links: usize,
}

impl RelationIndex {
    /// Build the index for a snapshot
    pub fn build(snapshot: &CaseSnapshot) -> Self {
        let entities = snapshot.entity_refs();
        let mut index = Self::default();

        for link in &snapshot.links {
            let dangling = !entities.contains(&link.from) || !entities.contains(&link.to);
            if dangling || link.from == link.to {
                index.dropped_links += 1;
                continue;
            }

            if link.from.kind == EntityKind::Span {
                index.spans_with_outgoing.insert(link.from.id);
            }

            match link.role {
                LinkRole::Evidence => index.add_evidence(link.from, link.to),
                LinkRole::Contradicts => {
                    for end in [link.from, link.to] {
                        if end.kind == EntityKind::Fact {
                            index.fact_links.entry(end.id).or_default().contradiction_count += 1;
                        }
                    }
                }
            }
        }

        for facts in index.claim_facts.values_mut() {
            facts.sort();
            facts.dedup();
        }

        for fact in &snapshot.facts {
            let rules: BTreeSet<EntityId> = snapshot
                .rules
                .iter()
                .filter(|r| r.matches(&fact.tags))
                .map(|r| r.id)
                .collect();
            index.fact_rules.insert(fact.id, rules);
        }
        for claim in &snapshot.claims {
            let rules: BTreeSet<EntityId> = snapshot
                .rules
                .iter()
                .filter(|r| r.matches(&claim.tags))
                .map(|r| r.id)
                .collect();
            index.claim_rules.insert(claim.id, rules);
        }

        index.documents_with_spans = snapshot.spans.iter().map(|s| s.document_id).collect();

        if index.dropped_links > 0 {
            tracing::debug!("Relation index skipped {} dangling links", index.dropped_links);
        }

        index
    }

    fn add_evidence(&mut self, a: EntityRef, b: EntityRef) {
        match (a.kind, b.kind) {
            (EntityKind::Claim, EntityKind::Fact) => {
                self.claim_facts.entry(a.id).or_default().push(b.id);
            }
            (EntityKind::Fact, EntityKind::Claim) => {
                self.claim_facts.entry(b.id).or_default().push(a.id);
            }
            _ => {
                for (end, other) in [(a, b), (b, a)] {
                    if end.kind == EntityKind::Fact && other.kind != EntityKind::Claim {
                        let entry = self.fact_links.entry(end.id).or_default();
                        entry.evidence_count += 1;
                        entry.evidence.push(other);
                    }
                }
            }
        }
    }

    /// Facts attached to a claim, sorted by id
    pub fn facts_for_claim(&self, claim_id: EntityId) -> &[EntityId] {
        self.claim_facts.get(&claim_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Evidence and contradiction tallies for a fact
    pub fn fact_links(&self, fact_id: EntityId) -> FactLinks {
        self.fact_links.get(&fact_id).cloned().unwrap_or_default()
    }

    /// Number of evidence links of a fact
    pub fn evidence_count(&self, fact_id: EntityId) -> u32 {
        self.fact_links.get(&fact_id).map_or(0, |l| l.evidence_count)
    }

    /// Number of contradiction links of a fact
    pub fn contradiction_count(&self, fact_id: EntityId) -> u32 {
        self.fact_links.get(&fact_id).map_or(0, |l| l.contradiction_count)
    }

    /// Rules matching the fact's tags, plus the claim's tags when given
    pub fn applicable_rules(
        &self,
        fact_id: EntityId,
        claim_id: Option<EntityId>,
    ) -> BTreeSet<EntityId> {
        let mut rules = self.fact_rules.get(&fact_id).cloned().unwrap_or_default();
        if let Some(claim_rules) = claim_id.and_then(|c| self.claim_rules.get(&c)) {
            rules.extend(claim_rules.iter().copied());
        }
        rules
    }

    /// Count of [`RelationIndex::applicable_rules`]
    pub fn applicable_rule_count(&self, fact_id: EntityId, claim_id: Option<EntityId>) -> u32 {
        self.applicable_rules(fact_id, claim_id).len() as u32
    }

    /// Whether a span is the source of at least one link
    pub fn span_has_outgoing_link(&self, span_id: EntityId) -> bool {
        self.spans_with_outgoing.contains(&span_id)
    }

    /// Whether any span was cut from a document
    pub fn document_has_span(&self, document_id: EntityId) -> bool {
        self.documents_with_spans.contains(&document_id)
    }

    /// Number of links skipped because an endpoint was missing
    pub fn dropped_links(&self) -> usize {
        self.dropped_links
    }
}
