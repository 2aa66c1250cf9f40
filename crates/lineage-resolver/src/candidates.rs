//! Candidate generation
//!
//! Name tokens are the blocking key: only persons sharing enough case-folded name
//! tokens with the subject are scored at all. A person without name claims never
//! produces candidates and is never a candidate for anyone.

use crate::error::store_err;
use crate::profile::{tokenize, PersonProfile};
use crate::{scorer, ResolutionError, ResolverConfig};
use lineage_domain::traits::{ClaimQuery, ClaimsStore};
use lineage_domain::{FeatureScores, PersonId, Predicate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A possible duplicate of some person
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    /// The other person
    pub person: PersonId,
    /// Composite similarity score
    pub score: f64,
    /// Feature breakdown behind `score`
    pub features: FeatureScores,
}

/// Narrows the search for duplicates of one person
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    max_candidates: usize,
    min_shared_tokens: usize,
}

impl CandidateGenerator {
    /// Create a generator from resolver settings
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            max_candidates: config.max_candidates,
            min_shared_tokens: config.min_shared_tokens,
        }
    }

    /// Ranked candidates for `person`, best first
    ///
    /// At most one entry per candidate (its best score), sorted by descending score
    /// with ascending id breaking ties, truncated to the configured maximum.
    pub fn generate<S: ClaimsStore>(
        &self,
        store: &S,
        person: PersonId,
    ) -> Result<Vec<Candidate>, ResolutionError>
    where
        S::Error: std::fmt::Display,
    {
        let profile = PersonProfile::load(store, person)?;
        let own_tokens = profile.name_tokens();
        if own_tokens.is_empty() {
            return Ok(Vec::new());
        }

        let name_claims = store
            .list_active_claims(&ClaimQuery::for_predicate(Predicate::HasName))
            .map_err(store_err)?;

        let mut others: BTreeMap<PersonId, Vec<BTreeSet<String>>> = BTreeMap::new();
        for claim in name_claims.iter().filter(|c| c.subject != person) {
            if let Some(name) = claim.literal_value() {
                let tokens = tokenize(name);
                if !tokens.is_empty() {
                    others.entry(claim.subject).or_default().push(tokens);
                }
            }
        }

        let mut best: BTreeMap<PersonId, Candidate> = BTreeMap::new();
        for (other, token_sets) in &others {
            if !self.blocks_together(&own_tokens, token_sets) {
                continue;
            }

            match store.get_person(*other).map_err(store_err)? {
                Some(p) if p.active => {}
                _ => continue,
            }

            let other_profile = PersonProfile::load(store, *other)?;
            let features = scorer::score(&profile, &other_profile);
            let candidate = Candidate {
                person: *other,
                score: features.composite(),
                features,
            };
            if candidate.score <= 0.0 {
                continue;
            }

            best.entry(*other)
                .and_modify(|kept| {
                    if candidate.score > kept.score {
                        *kept = candidate;
                    }
                })
                .or_insert(candidate);
        }

        let mut ranked: Vec<Candidate> = best.into_values().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.person.cmp(&b.person)));
        ranked.truncate(self.max_candidates);

        tracing::debug!(
            person = %person,
            compared = others.len(),
            candidates = ranked.len(),
            "generated candidates"
        );

        Ok(ranked)
    }

    /// Whether any name pair shares at least `min_shared_tokens` tokens
    fn blocks_together(&self, ours: &[BTreeSet<String>], theirs: &[BTreeSet<String>]) -> bool {
        ours.iter().any(|a| {
            theirs
                .iter()
                .any(|b| a.intersection(b).count() >= self.min_shared_tokens)
        })
    }
}
