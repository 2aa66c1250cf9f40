//! JSON snapshot format for loading fixture data.
//!
//! ```json
//! {
//!   "persons": [
//!     { "id": "0190a5c3-0000-7000-8000-000000000001" }
//!   ],
//!   "claims": [
//!     {
//!       "subject": "0190a5c3-0000-7000-8000-000000000001",
//!       "predicate": "born_on",
//!       "value": "12 MAR 1850",
//!       "confidence": 0.9
//!     }
//!   ]
//! }
//! ```
//!
//! Claims without a `source` share one source id generated for the load.

use crate::error::{CliError, Result};
use chrono::NaiveDate;
use lineage_domain::traits::ClaimsStore;
use lineage_domain::{Claim, ClaimId, Person, PersonId, PlaceId, Predicate, SourceId};
use lineage_store::SqliteStore;
use serde::Deserialize;

/// A snapshot of persons and claims.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    /// Person records
    #[serde(default)]
    pub persons: Vec<PersonRecord>,

    /// Claims about those persons
    #[serde(default)]
    pub claims: Vec<ClaimRecord>,
}

/// Person entry.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonRecord {
    /// Person id
    pub id: PersonId,

    /// False for a record already merged away
    #[serde(default = "default_true")]
    pub active: bool,

    /// Survivor of an earlier merge
    #[serde(default)]
    pub merged_into: Option<PersonId>,
}

/// Claim entry: exactly one of `value` and `object` must be set.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimRecord {
    /// Claim id; generated when absent
    #[serde(default)]
    pub id: Option<ClaimId>,

    /// Subject person
    pub subject: PersonId,

    /// Predicate wire name
    pub predicate: Predicate,

    /// Literal object
    #[serde(default)]
    pub value: Option<String>,

    /// Object person
    #[serde(default)]
    pub object: Option<PersonId>,

    /// Place reference
    #[serde(default)]
    pub place: Option<PlaceId>,

    /// Evidence source
    #[serde(default)]
    pub source: Option<SourceId>,

    /// Confidence score in [0, 1]
    pub confidence: f64,

    /// Earliest time the assertion holds
    #[serde(default)]
    pub time_start: Option<NaiveDate>,

    /// Latest time the assertion holds
    #[serde(default)]
    pub time_end: Option<NaiveDate>,

    /// Producer's reasoning
    #[serde(default)]
    pub rationale: Option<String>,
}

/// Records written by a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Persons inserted
    pub persons: usize,
    /// Claims inserted
    pub claims: usize,
}

impl Snapshot {
    /// Parse a snapshot from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Insert every person and claim in one transaction.
    ///
    /// Active persons are written first so merge survivors exist before the
    /// records pointing at them.
    pub fn load_into(&self, store: &mut SqliteStore) -> Result<LoadReport> {
        let default_source = SourceId::new();
        let claims = self
            .claims
            .iter()
            .enumerate()
            .map(|(i, record)| record.to_claim(default_source).map_err(|e| CliError::InvalidInput(format!("claim #{}: {}", i, e))))
            .collect::<Result<Vec<_>>>()?;

        let mut persons: Vec<Person> = self.persons.iter().map(PersonRecord::to_person).collect();
        persons.sort_by_key(|p| !p.active);

        store.atomically(|s| {
            for person in &persons {
                s.insert_person(person)?;
            }
            for claim in &claims {
                s.insert_claim(claim)?;
            }
            Ok(())
        })?;

        tracing::info!(persons = persons.len(), claims = claims.len(), "loaded snapshot");
        Ok(LoadReport {
            persons: persons.len(),
            claims: claims.len(),
        })
    }
}

impl PersonRecord {
    fn to_person(&self) -> Person {
        let mut person = Person::with_id(self.id);
        person.active = self.active && self.merged_into.is_none();
        person.merged_into = self.merged_into;
        person
    }
}

impl ClaimRecord {
    fn to_claim(&self, default_source: SourceId) -> std::result::Result<Claim, String> {
        let source = self.source.unwrap_or(default_source);
        let mut claim = match (&self.value, self.object) {
            (Some(value), None) => Claim::literal(self.subject, self.predicate, value.clone(), source, self.confidence),
            (None, Some(object)) => Claim::relation(self.subject, self.predicate, object, source, self.confidence),
            (Some(_), Some(_)) => return Err("set either 'value' or 'object', not both".to_string()),
            (None, None) => return Err("one of 'value' or 'object' is required".to_string()),
        };

        if let Some(id) = self.id {
            claim = claim.with_id(id);
        }
        if let Some(place) = self.place {
            claim = claim.with_place(place);
        }
        if self.time_start.is_some() || self.time_end.is_some() {
            claim = claim.with_time_bounds(self.time_start, self.time_end);
        }
        if let Some(rationale) = &self.rationale {
            claim = claim.with_rationale(rationale.clone());
        }
        Ok(claim)
    }
}

fn default_true() -> bool {
    true
}
