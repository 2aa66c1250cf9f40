//! Claim module - the only unit of fact in the knowledge graph

use crate::{
    ClaimId, ConfidenceTier, InvariantViolation, PersonId, PlaceId, Predicate,
    PredicateCategory, SourceId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A provenance-tagged assertion about a subject person
///
/// Claims are never edited in place except for two administrative moves: a merge
/// reassigns the subject, and supersession deactivates a claim in favour of another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,

    /// Person the claim is about
    pub subject: PersonId,

    /// Relation type
    pub predicate: Predicate,

    /// Object person for relational predicates
    pub object_ref: Option<PersonId>,

    /// Object literal for scalar predicates
    pub object_value: Option<String>,

    /// Place the assertion is attached to
    pub place: Option<PlaceId>,

    /// Earliest time the assertion holds
    pub time_start: Option<NaiveDate>,

    /// Latest time the assertion holds
    pub time_end: Option<NaiveDate>,

    /// Evidence source
    pub source: SourceId,

    /// Confidence score in [0, 1]
    pub confidence: f64,

    /// Tier derived from `confidence`
    pub tier: ConfidenceTier,

    /// Optional reasoning recorded by the producer
    pub rationale: Option<String>,

    /// False once superseded or retracted
    pub active: bool,

    /// Claim that replaced this one
    pub superseded_by: Option<ClaimId>,

    /// When this claim was created (seconds since Unix epoch)
    pub created_at: u64,
}

impl Claim {
    fn base(subject: PersonId, predicate: Predicate, source: SourceId, confidence: f64) -> Self {
        Self {
            id: ClaimId::new(),
            subject,
            predicate,
            object_ref: None,
            object_value: None,
            place: None,
            time_start: None,
            time_end: None,
            source,
            confidence,
            tier: ConfidenceTier::from_score(confidence),
            rationale: None,
            active: true,
            superseded_by: None,
            created_at: crate::unix_now(),
        }
    }

    /// Create a claim carrying a literal object (names, dates, places, ...)
    pub fn literal(
        subject: PersonId,
        predicate: Predicate,
        value: impl Into<String>,
        source: SourceId,
        confidence: f64,
    ) -> Self {
        let mut claim = Self::base(subject, predicate, source, confidence);
        claim.object_value = Some(value.into());
        claim
    }

    /// Create a claim referencing another person (parent-of, spouse-of, ...)
    pub fn relation(
        subject: PersonId,
        predicate: Predicate,
        object: PersonId,
        source: SourceId,
        confidence: f64,
    ) -> Self {
        let mut claim = Self::base(subject, predicate, source, confidence);
        claim.object_ref = Some(object);
        claim
    }

    /// Override the generated id
    pub fn with_id(mut self, id: ClaimId) -> Self {
        self.id = id;
        self
    }

    /// Attach a place reference
    pub fn with_place(mut self, place: PlaceId) -> Self {
        self.place = Some(place);
        self
    }

    /// Attach time bounds
    pub fn with_time_bounds(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.time_start = start;
        self.time_end = end;
        self
    }

    /// Attach a producer rationale
    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    /// Trimmed, non-empty literal value
    pub fn literal_value(&self) -> Option<&str> {
        self.object_value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// The value used to compare claims of the same predicate: the literal if
    /// present, otherwise the object reference
    pub fn resolved_value(&self) -> Option<String> {
        match self.literal_value() {
            Some(value) => Some(value.to_string()),
            None => self.object_ref.map(|id| id.to_string()),
        }
    }

    /// Check the claim invariants
    ///
    /// - confidence is finite and within [0, 1]
    /// - relational predicates carry an object reference and no literal
    /// - literal predicates carry a non-empty literal and no reference
    /// - time bounds, when both present, are ordered
    pub fn check(&self) -> Result<(), InvariantViolation> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(InvariantViolation(format!(
                "claim {} confidence {} is outside [0, 1]",
                self.id, self.confidence
            )));
        }

        match self.predicate.category() {
            PredicateCategory::Relational => {
                if self.object_ref.is_none() || self.object_value.is_some() {
                    return Err(InvariantViolation(format!(
                        "claim {} ({}) must reference an object person and carry no literal",
                        self.id, self.predicate
                    )));
                }
            }
            PredicateCategory::Literal => {
                if self.literal_value().is_none() || self.object_ref.is_some() {
                    return Err(InvariantViolation(format!(
                        "claim {} ({}) must carry a literal value and no object reference",
                        self.id, self.predicate
                    )));
                }
            }
        }

        if let (Some(start), Some(end)) = (self.time_start, self.time_end) {
            if start > end {
                return Err(InvariantViolation(format!(
                    "claim {} time bounds are reversed ({} > {})",
                    self.id, start, end
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_claim_derives_tier() {
        let claim = Claim::literal(PersonId::new(), Predicate::HasName, "John Smith", SourceId::new(), 0.9);
        assert_eq!(claim.tier, ConfidenceTier::High);
        assert!(claim.active);
        assert!(claim.check().is_ok());
    }

    #[test]
    fn test_resolved_value_prefers_literal() {
        let person = PersonId::new();
        let parent = PersonId::new();

        let literal = Claim::literal(person, Predicate::BornOn, " 1900-01-01 ", SourceId::new(), 0.5);
        assert_eq!(literal.resolved_value().as_deref(), Some("1900-01-01"));

        let relation = Claim::relation(person, Predicate::ChildOf, parent, SourceId::new(), 0.5);
        assert_eq!(relation.resolved_value(), Some(parent.to_string()));
    }

    #[test]
    fn test_check_rejects_out_of_range_confidence() {
        let claim = Claim::literal(PersonId::new(), Predicate::HasName, "A B", SourceId::new(), 1.5);
        assert!(claim.check().is_err());

        let claim = Claim::literal(PersonId::new(), Predicate::HasName, "A B", SourceId::new(), f64::NAN);
        assert!(claim.check().is_err());
    }

    #[test]
    fn test_check_rejects_wrong_object_kind() {
        let mut claim = Claim::relation(PersonId::new(), Predicate::ParentOf, PersonId::new(), SourceId::new(), 0.5);
        claim.object_value = Some("oops".to_string());
        assert!(claim.check().is_err());

        let claim = Claim::literal(PersonId::new(), Predicate::BornOn, "   ", SourceId::new(), 0.5);
        assert!(claim.check().is_err());
    }

    #[test]
    fn test_check_rejects_reversed_time_bounds() {
        let start = NaiveDate::from_ymd_opt(1900, 1, 1);
        let end = NaiveDate::from_ymd_opt(1850, 1, 1);
        let claim = Claim::literal(PersonId::new(), Predicate::ResidedAt, "Boston", SourceId::new(), 0.5)
            .with_time_bounds(start, end);
        assert!(claim.check().is_err());
    }
}
