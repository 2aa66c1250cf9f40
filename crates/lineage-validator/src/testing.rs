//! In-memory store for unit tests

use lineage_domain::traits::{ClaimQuery, ClaimsStore};
use lineage_domain::{CanonicalFields, Claim, ClaimId, Flag, MergeEvent, Person, PersonId};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub(crate) struct MockStore {
    pub persons: BTreeMap<PersonId, Person>,
    pub claims: BTreeMap<ClaimId, Claim>,
    pub flags: Vec<Flag>,
    /// Reject flag writes once this many flags are stored
    pub flag_capacity: Option<usize>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_person(&mut self, id: PersonId) -> PersonId {
        self.persons.insert(id, Person::with_id(id));
        id
    }

    pub fn add_claim(&mut self, claim: Claim) -> ClaimId {
        let id = claim.id;
        self.claims.insert(id, claim);
        id
    }

    pub fn absorb(&mut self, id: PersonId, into: PersonId) {
        if let Some(person) = self.persons.get_mut(&id) {
            person.active = false;
            person.merged_into = Some(into);
        }
    }
}

impl ClaimsStore for MockStore {
    type Error = String;

    fn list_active_persons(&self) -> Result<Vec<Person>, Self::Error> {
        Ok(self.persons.values().filter(|p| p.active).cloned().collect())
    }

    fn get_person(&self, id: PersonId) -> Result<Option<Person>, Self::Error> {
        Ok(self.persons.get(&id).cloned())
    }

    fn list_active_claims(&self, query: &ClaimQuery) -> Result<Vec<Claim>, Self::Error> {
        Ok(self
            .claims
            .values()
            .filter(|c| c.active)
            .filter(|c| query.subject.map_or(true, |s| c.subject == s))
            .filter(|c| query.predicate.map_or(true, |p| c.predicate == p))
            .cloned()
            .collect())
    }

    fn deactivate_person(&mut self, _id: PersonId, _merged_into: PersonId) -> Result<(), Self::Error> {
        Err("validation never deactivates persons".to_string())
    }

    fn redirect_merged_into(&mut self, _from: PersonId, _to: PersonId) -> Result<usize, Self::Error> {
        Err("validation never redirects persons".to_string())
    }

    fn reassign_claim_subject(&mut self, _claim_id: ClaimId, _new_subject: PersonId) -> Result<(), Self::Error> {
        Err("validation never moves claims".to_string())
    }

    fn update_canonical_fields(&mut self, _id: PersonId, _fields: &CanonicalFields) -> Result<(), Self::Error> {
        Err("validation never edits persons".to_string())
    }

    fn create_merge_event(&mut self, _event: &MergeEvent) -> Result<(), Self::Error> {
        Err("validation never merges".to_string())
    }

    fn create_flag(&mut self, flag: &Flag) -> Result<(), Self::Error> {
        if self.flag_capacity.is_some_and(|cap| self.flags.len() >= cap) {
            return Err("flags table is full".to_string());
        }
        self.flags.push(flag.clone());
        Ok(())
    }

    fn atomically<R, F>(&mut self, f: F) -> Result<R, Self::Error>
    where
        F: FnOnce(&mut Self) -> Result<R, Self::Error>,
    {
        let snapshot = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }
}
