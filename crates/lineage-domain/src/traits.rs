//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{CanonicalFields, Claim, ClaimId, Flag, MergeEvent, Person, PersonId, Predicate};

/// Trait for reading and mutating the claims graph
///
/// Implemented by the infrastructure layer (lineage-store). Both engines take the
/// store as an explicit argument and hold nothing across calls.
pub trait ClaimsStore {
    /// Error type for store operations
    type Error;

    /// All active persons, ascending by id
    fn list_active_persons(&self) -> Result<Vec<Person>, Self::Error>;

    /// Get a person by id, active or not
    fn get_person(&self, id: PersonId) -> Result<Option<Person>, Self::Error>;

    /// Active claims matching the query, ascending by claim id
    fn list_active_claims(&self, query: &ClaimQuery) -> Result<Vec<Claim>, Self::Error>;

    /// Deactivate a person and point it at the survivor
    ///
    /// Fails when `merged_into` equals `id` or names a missing or inactive person.
    fn deactivate_person(&mut self, id: PersonId, merged_into: PersonId) -> Result<(), Self::Error>;

    /// Re-point every person merged into `from` at `to`
    ///
    /// Returns the number of records updated.
    fn redirect_merged_into(&mut self, from: PersonId, to: PersonId) -> Result<usize, Self::Error>;

    /// Move a claim to a new subject, leaving every other attribute intact
    fn reassign_claim_subject(&mut self, claim_id: ClaimId, new_subject: PersonId) -> Result<(), Self::Error>;

    /// Replace a person's derived display fields
    fn update_canonical_fields(&mut self, id: PersonId, fields: &CanonicalFields) -> Result<(), Self::Error>;

    /// Persist a merge audit record
    fn create_merge_event(&mut self, event: &MergeEvent) -> Result<(), Self::Error>;

    /// Persist a validation flag
    fn create_flag(&mut self, flag: &Flag) -> Result<(), Self::Error>;

    /// Run `f` as one transaction
    ///
    /// Commits when `f` returns `Ok`, rolls back every write made by `f` otherwise.
    fn atomically<R, F>(&mut self, f: F) -> Result<R, Self::Error>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<R, Self::Error>;
}

/// Filter for active-claim queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClaimQuery {
    /// Only claims about this person
    pub subject: Option<PersonId>,

    /// Only claims with this predicate
    pub predicate: Option<Predicate>,
}

impl ClaimQuery {
    /// All active claims about one person
    pub fn for_subject(subject: PersonId) -> Self {
        Self {
            subject: Some(subject),
            predicate: None,
        }
    }

    /// All active claims with one predicate
    pub fn for_predicate(predicate: Predicate) -> Self {
        Self {
            subject: None,
            predicate: Some(predicate),
        }
    }

    /// Narrow to a predicate
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }
}
