//! Resolution orchestrator

use crate::candidates::{Candidate, CandidateGenerator};
use crate::error::store_err;
use crate::merge::MergeExecutor;
use crate::profile::PersonProfile;
use crate::{scorer, ResolutionError, ResolutionSummary, ResolverConfig};
use lineage_domain::traits::ClaimsStore;
use lineage_domain::{FeatureScores, PersonId, RunId};
use std::time::Instant;

/// Batch identity resolution over the whole active population
///
/// # Examples
///
/// ```no_run
/// use lineage_resolver::{IdentityResolver, ResolverConfig};
/// use lineage_store::SqliteStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = SqliteStore::new("lineage.db")?;
/// let resolver = IdentityResolver::new(ResolverConfig::default())?;
///
/// let summary = resolver.resolve_all(&mut store)?;
/// println!("{}", summary.summary());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    config: ResolverConfig,
    run_id: Option<RunId>,
    generator: CandidateGenerator,
}

impl IdentityResolver {
    /// Create a resolver, rejecting unusable configuration
    pub fn new(config: ResolverConfig) -> Result<Self, ResolutionError> {
        config.validate()?;
        Ok(Self {
            generator: CandidateGenerator::new(&config),
            config,
            run_id: None,
        })
    }

    /// Create a resolver with default configuration
    pub fn default_config() -> Self {
        let config = ResolverConfig::default();
        Self {
            generator: CandidateGenerator::new(&config),
            config,
            run_id: None,
        }
    }

    /// Tag merge events and the summary with a run id
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Ranked merge candidates for one person
    pub fn candidates<S: ClaimsStore>(
        &self,
        store: &S,
        person: PersonId,
    ) -> Result<Vec<Candidate>, ResolutionError>
    where
        S::Error: std::fmt::Display,
    {
        match store.get_person(person).map_err(store_err)? {
            Some(_) => self.generator.generate(store, person),
            None => Err(ResolutionError::NotFound(format!("person {}", person))),
        }
    }

    /// Feature scores for an arbitrary pair of persons
    pub fn score_pair<S: ClaimsStore>(
        &self,
        store: &S,
        a: PersonId,
        b: PersonId,
    ) -> Result<FeatureScores, ResolutionError>
    where
        S::Error: std::fmt::Display,
    {
        for id in [a, b] {
            if store.get_person(id).map_err(store_err)?.is_none() {
                return Err(ResolutionError::NotFound(format!("person {}", id)));
            }
        }
        let left = PersonProfile::load(store, a)?;
        let right = PersonProfile::load(store, b)?;
        Ok(scorer::score(&left, &right))
    }

    /// Run one resolution pass
    ///
    /// Persons are visited in ascending id order, so among near-duplicates the one
    /// with the lowest id survives. Each person and each candidate is re-read before
    /// use: anything absorbed earlier in the pass is skipped. A store failure aborts
    /// the pass; merges already committed stay committed.
    pub fn resolve_all<S: ClaimsStore>(&self, store: &mut S) -> Result<ResolutionSummary, ResolutionError>
    where
        S::Error: std::fmt::Display,
    {
        let started = Instant::now();
        let executor = MergeExecutor::new(self.config.performed_by.clone(), self.run_id);
        let mut summary = ResolutionSummary {
            run_id: self.run_id,
            ..Default::default()
        };

        let persons = store.list_active_persons().map_err(store_err)?;
        tracing::info!(
            persons = persons.len(),
            threshold = self.config.merge_threshold,
            dry_run = self.config.dry_run,
            "starting identity resolution pass"
        );

        for listed in &persons {
            match store.get_person(listed.id).map_err(store_err)? {
                Some(person) if person.active => {}
                Some(_) => {
                    tracing::debug!(person = %listed.id, "skipping person absorbed earlier in this pass");
                    summary.persons_skipped += 1;
                    continue;
                }
                None => return Err(ResolutionError::NotFound(format!("person {}", listed.id))),
            }

            let candidates = self.generator.generate(store, listed.id)?;
            summary.persons_processed += 1;
            summary.candidates_evaluated += candidates.len();

            for candidate in candidates {
                // ranked best first
                if candidate.score < self.config.merge_threshold {
                    break;
                }

                match store.get_person(candidate.person).map_err(store_err)? {
                    Some(p) if p.active => {}
                    _ => {
                        tracing::warn!(
                            person = %listed.id,
                            candidate = %candidate.person,
                            "candidate is no longer active, not merging"
                        );
                        continue;
                    }
                }

                if self.config.dry_run {
                    tracing::info!(
                        target = %listed.id,
                        source = %candidate.person,
                        score = candidate.score,
                        "DRY RUN: would merge"
                    );
                    summary.merges_proposed += 1;
                    continue;
                }

                executor.execute(store, listed.id, candidate.person, candidate.features)?;
                summary.merges_performed += 1;
            }
        }

        summary.elapsed_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            processed = summary.persons_processed,
            skipped = summary.persons_skipped,
            candidates = summary.candidates_evaluated,
            merges = summary.merges_performed,
            proposed = summary.merges_proposed,
            elapsed_ms = summary.elapsed_ms,
            "identity resolution pass complete"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockStore;
    use lineage_domain::{Claim, Predicate, SourceId};

    fn person(store: &mut MockStore, id: u128, name: &str, born: Option<&str>) -> PersonId {
        let p = store.add_person(PersonId::from_value(id));
        let source = SourceId::new();
        store.add_claim(Claim::literal(p, Predicate::HasName, name, source, 0.9));
        if let Some(born) = born {
            store.add_claim(Claim::literal(p, Predicate::BornOn, born, source, 0.9));
        }
        p
    }

    #[test]
    fn test_chain_of_duplicates_collapses_into_lowest_id() {
        let mut store = MockStore::new();
        let a = person(&mut store, 1, "John Smith", Some("1850"));
        let b = person(&mut store, 2, "John Smith", Some("1850"));
        let c = person(&mut store, 3, "John Smith", Some("1850"));

        let summary = IdentityResolver::default_config().resolve_all(&mut store).unwrap();

        assert_eq!(summary.merges_performed, 2);
        assert_eq!(summary.persons_processed, 1);
        assert_eq!(summary.persons_skipped, 2);
        assert!(store.persons[&a].active);
        assert_eq!(store.persons[&b].merged_into, Some(a));
        assert_eq!(store.persons[&c].merged_into, Some(a));
        assert_eq!(store.active_claim_count(a), 6);
    }

    #[test]
    fn test_below_threshold_is_not_merged() {
        let mut store = MockStore::new();
        // identical names but conflicting dates: 0.4 + 0.15 + 0.1 + 0.05 = 0.70
        person(&mut store, 1, "Mary Jones", Some("1850"));
        person(&mut store, 2, "Mary Jones", Some("1890"));

        let summary = IdentityResolver::default_config().resolve_all(&mut store).unwrap();
        assert_eq!(summary.merges_performed, 0);
        assert_eq!(summary.candidates_evaluated, 2);
        assert_eq!(summary.persons_processed, 2);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let mut store = MockStore::new();
        person(&mut store, 1, "John Smith", Some("1850"));
        person(&mut store, 2, "John Smith", Some("1850"));

        let config = ResolverConfig {
            dry_run: true,
            ..Default::default()
        };
        let summary = IdentityResolver::new(config).unwrap().resolve_all(&mut store).unwrap();

        assert_eq!(summary.merges_performed, 0);
        assert_eq!(summary.merges_proposed, 2);
        assert!(store.merge_events.is_empty());
        assert!(store.persons.values().all(|p| p.active));
    }

    #[test]
    fn test_run_id_is_recorded() {
        let mut store = MockStore::new();
        person(&mut store, 1, "John Smith", Some("1850"));
        person(&mut store, 2, "John Smith", Some("1850"));

        let run_id = RunId::new();
        let summary = IdentityResolver::default_config()
            .with_run_id(run_id)
            .resolve_all(&mut store)
            .unwrap();

        assert_eq!(summary.run_id, Some(run_id));
        assert_eq!(store.merge_events[0].run_id, Some(run_id));
    }

    #[test]
    fn test_store_failure_aborts_pass() {
        let mut store = MockStore::new();
        let a = person(&mut store, 1, "John Smith", Some("1850"));
        let b = person(&mut store, 2, "John Smith", Some("1850"));
        store.fail_canonical_updates = true;

        let result = IdentityResolver::default_config().resolve_all(&mut store);
        assert!(matches!(result, Err(ResolutionError::Store(_))));
        assert!(store.persons[&a].active);
        assert!(store.persons[&b].active);
        assert!(store.merge_events.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ResolverConfig {
            merge_threshold: -0.1,
            ..Default::default()
        };
        assert!(IdentityResolver::new(config).is_err());
    }

    #[test]
    fn test_candidates_for_unknown_person() {
        let store = MockStore::new();
        let resolver = IdentityResolver::default_config();
        assert!(matches!(
            resolver.candidates(&store, PersonId::new()),
            Err(ResolutionError::NotFound(_))
        ));
    }

    #[test]
    fn test_score_pair() {
        let mut store = MockStore::new();
        let a = person(&mut store, 1, "John Smith", Some("1850"));
        let b = person(&mut store, 2, "John Smith", Some("1850"));

        let features = IdentityResolver::default_config().score_pair(&store, a, b).unwrap();
        assert_eq!(features.name, 1.0);
        assert_eq!(features.dates, 1.0);
        assert!((features.composite() - 0.85).abs() < 1e-12);
    }
}
