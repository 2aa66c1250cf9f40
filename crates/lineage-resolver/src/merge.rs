//! Merge executor
//!
//! Commits one merge decision as a single transaction: audit record, deactivation of
//! the absorbed person, claim reassignment and canonical-field refresh all land
//! together or not at all.

use crate::error::store_err;
use crate::ResolutionError;
use lineage_domain::traits::{ClaimQuery, ClaimsStore};
use lineage_domain::{CanonicalFields, FeatureScores, MergeEvent, PersonId, RunId};

/// Commits merges on behalf of a resolution run
#[derive(Debug, Clone)]
pub struct MergeExecutor {
    performed_by: String,
    run_id: Option<RunId>,
}

impl MergeExecutor {
    /// Create an executor recording `performed_by` and `run_id` on every event
    pub fn new(performed_by: impl Into<String>, run_id: Option<RunId>) -> Self {
        Self {
            performed_by: performed_by.into(),
            run_id,
        }
    }

    /// Merge `source` into `target`
    ///
    /// Both persons must exist, be active and differ. Every active claim of `source`
    /// moves to `target` unchanged; no claim is deduplicated against the target's.
    /// Persons previously absorbed by `source` are re-pointed at `target`.
    pub fn execute<S: ClaimsStore>(
        &self,
        store: &mut S,
        target: PersonId,
        source: PersonId,
        features: FeatureScores,
    ) -> Result<MergeEvent, ResolutionError>
    where
        S::Error: std::fmt::Display,
    {
        if target == source {
            return Err(ResolutionError::Precondition(format!(
                "person {} cannot be merged into itself",
                target
            )));
        }

        for id in [target, source] {
            match store.get_person(id).map_err(store_err)? {
                None => return Err(ResolutionError::NotFound(format!("person {}", id))),
                Some(p) if !p.active => {
                    return Err(ResolutionError::Precondition(format!(
                        "person {} is not active",
                        id
                    )))
                }
                Some(_) => {}
            }
        }

        let event = MergeEvent::automatic(source, target, features, self.run_id)
            .performed_by(self.performed_by.clone());

        let moved = store
            .atomically(|s| {
                s.create_merge_event(&event)?;
                s.deactivate_person(source, target)?;
                s.redirect_merged_into(source, target)?;

                let claims = s.list_active_claims(&ClaimQuery::for_subject(source))?;
                for claim in &claims {
                    s.reassign_claim_subject(claim.id, target)?;
                }

                let merged = s.list_active_claims(&ClaimQuery::for_subject(target))?;
                s.update_canonical_fields(target, &CanonicalFields::derive(&merged))?;
                Ok(claims.len())
            })
            .map_err(store_err)?;

        tracing::info!(
            source = %source,
            target = %target,
            score = event.confidence_score,
            claims_moved = moved,
            "merged person"
        );

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockStore;
    use lineage_domain::{Claim, MergeMethod, Predicate, SourceId};

    fn features() -> FeatureScores {
        FeatureScores {
            name: 1.0,
            dates: 1.0,
            places: 0.5,
            relationships: 0.5,
        }
    }

    fn two_people() -> (MockStore, PersonId, PersonId) {
        let mut store = MockStore::new();
        let target = store.add_person(PersonId::from_value(1));
        let source = store.add_person(PersonId::from_value(2));
        let src = SourceId::new();
        store.add_claim(Claim::literal(target, Predicate::HasName, "Ada Lovelace", src, 0.6));
        store.add_claim(Claim::literal(source, Predicate::HasName, "Augusta Ada King", src, 0.9));
        store.add_claim(Claim::literal(source, Predicate::BornOn, "1815-12-10", src, 0.9));
        (store, target, source)
    }

    #[test]
    fn test_merge_moves_claims_and_deactivates_source() {
        let (mut store, target, source) = two_people();
        let before = store.active_claim_count(target) + store.active_claim_count(source);

        let executor = MergeExecutor::new("system", None);
        let event = executor.execute(&mut store, target, source, features()).unwrap();

        assert_eq!(store.active_claim_count(target), before);
        assert_eq!(store.active_claim_count(source), 0);

        let absorbed = &store.persons[&source];
        assert!(!absorbed.active);
        assert_eq!(absorbed.merged_into, Some(target));
        assert!(store.persons[&target].active);

        assert_eq!(event.method, MergeMethod::Automatic);
        assert_eq!(event.performed_by.as_deref(), Some("system"));
        assert_eq!(store.merge_events.len(), 1);
        assert_eq!(
            event.rationale,
            "Automatic merge: score=0.850 (name=1.00, dates=1.00, places=0.50, relationships=0.50)"
        );
    }

    #[test]
    fn test_merge_refreshes_canonical_fields() {
        let (mut store, target, source) = two_people();
        MergeExecutor::new("system", None)
            .execute(&mut store, target, source, features())
            .unwrap();

        let canonical = &store.persons[&target].canonical;
        assert_eq!(canonical.name.as_deref(), Some("Augusta Ada King"));
        assert_eq!(canonical.birth_year, Some(1815));
    }

    #[test]
    fn test_merge_redirects_earlier_absorptions() {
        let (mut store, target, source) = two_people();
        let older = store.add_person(PersonId::from_value(3));
        store.set_inactive(older, source);

        MergeExecutor::new("system", None)
            .execute(&mut store, target, source, features())
            .unwrap();

        assert_eq!(store.persons[&older].merged_into, Some(target));
    }

    #[test]
    fn test_preconditions() {
        let (mut store, target, source) = two_people();
        let executor = MergeExecutor::new("system", None);

        assert!(matches!(
            executor.execute(&mut store, target, target, features()),
            Err(ResolutionError::Precondition(_))
        ));
        assert!(matches!(
            executor.execute(&mut store, target, PersonId::new(), features()),
            Err(ResolutionError::NotFound(_))
        ));

        store.set_inactive(source, target);
        assert!(matches!(
            executor.execute(&mut store, target, source, features()),
            Err(ResolutionError::Precondition(_))
        ));
        assert!(store.merge_events.is_empty());
    }

    #[test]
    fn test_failed_merge_leaves_nothing_behind() {
        let (mut store, target, source) = two_people();
        store.fail_canonical_updates = true;

        let result = MergeExecutor::new("system", None).execute(&mut store, target, source, features());
        assert!(matches!(result, Err(ResolutionError::Store(_))));

        assert!(store.merge_events.is_empty());
        assert!(store.persons[&source].active);
        assert_eq!(store.persons[&source].merged_into, None);
        assert_eq!(store.active_claim_count(source), 2);
    }
}
