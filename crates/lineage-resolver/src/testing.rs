//! In-memory store for unit tests

use lineage_domain::traits::{ClaimQuery, ClaimsStore};
use lineage_domain::{
    CanonicalFields, Claim, ClaimId, Flag, MergeEvent, Person, PersonId,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub(crate) struct MockStore {
    pub persons: BTreeMap<PersonId, Person>,
    pub claims: BTreeMap<ClaimId, Claim>,
    pub merge_events: Vec<MergeEvent>,
    pub flags: Vec<Flag>,
    pub fail_canonical_updates: bool,
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

    pub fn set_inactive(&mut self, id: PersonId, merged_into: PersonId) {
        if let Some(person) = self.persons.get_mut(&id) {
            person.active = false;
            person.merged_into = Some(merged_into);
        }
    }

    pub fn active_claim_count(&self, subject: PersonId) -> usize {
        self.claims
            .values()
            .filter(|c| c.active && c.subject == subject)
            .count()
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

    fn deactivate_person(&mut self, id: PersonId, merged_into: PersonId) -> Result<(), Self::Error> {
        if id == merged_into {
            return Err(format!("person {} cannot be merged into itself", id));
        }
        match self.persons.get(&merged_into) {
            Some(p) if p.active => {}
            _ => return Err(format!("merge target {} is not active", merged_into)),
        }
        let person = self
            .persons
            .get_mut(&id)
            .ok_or_else(|| format!("person {} not found", id))?;
        person.active = false;
        person.merged_into = Some(merged_into);
        Ok(())
    }

    fn redirect_merged_into(&mut self, from: PersonId, to: PersonId) -> Result<usize, Self::Error> {
        let mut moved = 0;
        for person in self.persons.values_mut() {
            if !person.active && person.merged_into == Some(from) && person.id != to {
                person.merged_into = Some(to);
                moved += 1;
            }
        }
        Ok(moved)
    }

    fn reassign_claim_subject(&mut self, claim_id: ClaimId, new_subject: PersonId) -> Result<(), Self::Error> {
        let claim = self
            .claims
            .get_mut(&claim_id)
            .ok_or_else(|| format!("claim {} not found", claim_id))?;
        claim.subject = new_subject;
        Ok(())
    }

    fn update_canonical_fields(&mut self, id: PersonId, fields: &CanonicalFields) -> Result<(), Self::Error> {
        if self.fail_canonical_updates {
            return Err("persons table is read-only".to_string());
        }
        let person = self
            .persons
            .get_mut(&id)
            .ok_or_else(|| format!("person {} not found", id))?;
        person.canonical = fields.clone();
        Ok(())
    }

    fn create_merge_event(&mut self, event: &MergeEvent) -> Result<(), Self::Error> {
        self.merge_events.push(event.clone());
        Ok(())
    }

    fn create_flag(&mut self, flag: &Flag) -> Result<(), Self::Error> {
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
