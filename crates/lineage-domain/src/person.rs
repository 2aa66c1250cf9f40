//! Person identity records

use crate::{dates, Claim, PersonId, Predicate};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Display fields derived from a person's best claims
///
/// These are a cache for presentation only; the claims remain authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalFields {
    /// Value of the highest-confidence name claim
    pub name: Option<String>,
    /// Year of the highest-confidence birth claim
    pub birth_year: Option<i32>,
    /// Year of the highest-confidence death claim
    pub death_year: Option<i32>,
}

impl CanonicalFields {
    /// Derive display fields from a set of claims
    ///
    /// Inactive claims are ignored. Ties on confidence go to the lowest claim id.
    pub fn derive(claims: &[Claim]) -> Self {
        let name = best_claim(claims, Predicate::HasName)
            .and_then(Claim::literal_value)
            .map(str::to_string);

        let year_of = |predicate| {
            best_claim(claims, predicate)
                .and_then(Claim::literal_value)
                .and_then(|value| dates::parse_fuzzy(value).ok())
                .map(|date| date.year())
        };

        Self {
            name,
            birth_year: year_of(Predicate::BornOn),
            death_year: year_of(Predicate::DiedOn),
        }
    }
}

/// Highest-confidence active claim for a predicate; ties go to the lowest claim id
pub fn best_claim(claims: &[Claim], predicate: Predicate) -> Option<&Claim> {
    claims
        .iter()
        .filter(|c| c.active && c.predicate == predicate)
        .fold(None, |best: Option<&Claim>, claim| match best {
            Some(current)
                if current.confidence > claim.confidence
                    || (current.confidence == claim.confidence && current.id < claim.id) =>
            {
                Some(current)
            }
            _ => Some(claim),
        })
}

/// A person identity record
///
/// Identity resolution may merge records: the absorbed record is deactivated and
/// points at the survivor through `merged_into`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier
    pub id: PersonId,

    /// False once merged into another person
    pub active: bool,

    /// Survivor of the merge that absorbed this record
    pub merged_into: Option<PersonId>,

    /// Derived display fields
    #[serde(default)]
    pub canonical: CanonicalFields,

    /// When this record was created (seconds since Unix epoch)
    pub created_at: u64,

    /// When this record was last changed (seconds since Unix epoch)
    pub updated_at: u64,
}

impl Person {
    /// Create a new active person with a fresh id
    pub fn new() -> Self {
        Self::with_id(PersonId::new())
    }

    /// Create a new active person with the given id
    pub fn with_id(id: PersonId) -> Self {
        let now = crate::unix_now();
        Self {
            id,
            active: true,
            merged_into: None,
            canonical: CanonicalFields::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for Person {
    fn default() -> Self {
        Self::new()
    }
}
