//! Per-person working set used by candidate generation and scoring

use crate::error::store_err;
use crate::ResolutionError;
use lineage_domain::traits::{ClaimQuery, ClaimsStore};
use lineage_domain::{Claim, PersonId, PlaceId, Predicate};
use std::collections::BTreeSet;

/// Case-folded whitespace tokens of a name
pub fn tokenize(name: &str) -> BTreeSet<String> {
    name.split_whitespace().map(str::to_lowercase).collect()
}

/// Features of one person, gathered from its active claims
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonProfile {
    /// Person the profile describes
    pub id: PersonId,
    /// Distinct name values
    pub names: BTreeSet<String>,
    /// Distinct birth date values
    pub births: BTreeSet<String>,
    /// Distinct death date values
    pub deaths: BTreeSet<String>,
    /// Places attached to any claim
    pub places: BTreeSet<PlaceId>,
    /// Persons reachable through kinship claims
    pub relatives: BTreeSet<PersonId>,
}

impl PersonProfile {
    /// Build a profile from claims about `id`; inactive claims and other subjects are ignored
    pub fn from_claims(id: PersonId, claims: &[Claim]) -> Self {
        let mut profile = Self {
            id,
            ..Default::default()
        };

        for claim in claims.iter().filter(|c| c.active && c.subject == id) {
            if let Some(place) = claim.place {
                profile.places.insert(place);
            }

            match claim.predicate {
                Predicate::HasName => insert_literal(&mut profile.names, claim),
                Predicate::BornOn => insert_literal(&mut profile.births, claim),
                Predicate::DiedOn => insert_literal(&mut profile.deaths, claim),
                p if p.is_kinship() => {
                    if let Some(other) = claim.object_ref {
                        profile.relatives.insert(other);
                    }
                }
                _ => {}
            }
        }

        profile
    }

    /// Load a profile from the store in one query
    pub fn load<S: ClaimsStore>(store: &S, id: PersonId) -> Result<Self, ResolutionError>
    where
        S::Error: std::fmt::Display,
    {
        let claims = store
            .list_active_claims(&ClaimQuery::for_subject(id))
            .map_err(store_err)?;
        Ok(Self::from_claims(id, &claims))
    }

    /// Token sets of every name, empty ones dropped
    pub fn name_tokens(&self) -> Vec<BTreeSet<String>> {
        self.names
            .iter()
            .map(|n| tokenize(n))
            .filter(|t| !t.is_empty())
            .collect()
    }
}

fn insert_literal(values: &mut BTreeSet<String>, claim: &Claim) {
    if let Some(value) = claim.literal_value() {
        values.insert(value.to_string());
    }
}
