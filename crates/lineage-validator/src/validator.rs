//! Validation pass orchestration

use crate::cycle::ParentGraph;
use crate::error::store_err;
use crate::rules::{self, ParentBirth};
use crate::{ValidationConfig, ValidationError, ValidationSummary};
use chrono::NaiveDate;
use lineage_domain::traits::{ClaimQuery, ClaimsStore};
use lineage_domain::{Claim, Flag, FlagKind, PersonId, Predicate};
use std::collections::BTreeMap;
use std::time::Instant;

/// Longest `merged_into` chain followed when resolving a parent reference
const MAX_MERGE_HOPS: usize = 16;

/// Birth dates already looked up during a pass, keyed by surviving person
type BirthCache = BTreeMap<PersonId, Option<NaiveDate>>;

/// Runs the anomaly rules over the claims graph and stores flags
///
/// # Examples
///
/// ```no_run
/// use lineage_validator::{ValidationConfig, Validator};
/// use lineage_store::SqliteStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = SqliteStore::new("lineage.db")?;
/// let validator = Validator::new(ValidationConfig::default())?;
///
/// let summary = validator.validate_all(&mut store)?;
/// println!("{}", summary.summary());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a validator, rejecting unusable configuration
    pub fn new(config: ValidationConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a validator with default configuration
    pub fn default_config() -> Self {
        Self {
            config: ValidationConfig::default(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Run one validation pass over every active person
    ///
    /// Per-person rules run in ascending id order; the cycle check runs once at the
    /// end over the whole parent graph. Each rule's flags for one person are written
    /// as a single transaction. A store failure aborts the pass; flags already
    /// written stay written.
    pub fn validate_all<S: ClaimsStore>(&self, store: &mut S) -> Result<ValidationSummary, ValidationError>
    where
        S::Error: std::fmt::Display,
    {
        let started = Instant::now();
        let mut summary = ValidationSummary::default();
        let mut births = BirthCache::new();

        let persons = store.list_active_persons().map_err(store_err)?;
        tracing::info!(persons = persons.len(), "starting validation pass");

        for person in &persons {
            self.run_person_rules(store, person.id, &mut births, &mut summary)?;
            summary.persons_validated += 1;
        }

        if self.config.check_circular_relationships {
            self.run_cycle_check(store, &mut summary)?;
        }

        summary.elapsed_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            validated = summary.persons_validated,
            flags = summary.flags_created,
            elapsed_ms = summary.elapsed_ms,
            "validation pass complete"
        );

        Ok(summary)
    }

    /// Run the per-person rules for one person
    ///
    /// The cycle check is graph-wide and does not run here.
    pub fn validate_person<S: ClaimsStore>(
        &self,
        store: &mut S,
        person: PersonId,
    ) -> Result<ValidationSummary, ValidationError>
    where
        S::Error: std::fmt::Display,
    {
        let started = Instant::now();
        match store.get_person(person).map_err(store_err)? {
            Some(p) if p.active => {}
            Some(_) => {
                return Err(ValidationError::NotFound(format!(
                    "person {} was merged away",
                    person
                )))
            }
            None => return Err(ValidationError::NotFound(format!("person {}", person))),
        }

        let mut summary = ValidationSummary::default();
        self.run_person_rules(store, person, &mut BirthCache::new(), &mut summary)?;
        summary.persons_validated = 1;
        summary.elapsed_ms = started.elapsed().as_millis() as u64;
        Ok(summary)
    }

    fn run_person_rules<S: ClaimsStore>(
        &self,
        store: &mut S,
        person: PersonId,
        births: &mut BirthCache,
        summary: &mut ValidationSummary,
    ) -> Result<(), ValidationError>
    where
        S::Error: std::fmt::Display,
    {
        let claims = store
            .list_active_claims(&ClaimQuery::for_subject(person))
            .map_err(store_err)?;
        tracing::debug!(person = %person, claims = claims.len(), "validating person");

        if self.config.check_lifespan {
            let flags = rules::lifespan(person, &claims, &self.config);
            write_flags(store, FlagKind::LifespanInvalid, flags, summary)?;
        }
        if self.config.check_generational_spacing {
            let flags = self.spacing_flags(store, person, &claims, births)?;
            write_flags(store, FlagKind::GenerationalSpacingInvalid, flags, summary)?;
        }
        if self.config.check_temporal_consistency {
            let flags = rules::temporal_consistency(person, &claims);
            write_flags(store, FlagKind::TemporalImpossibility, flags, summary)?;
        }
        if self.config.check_conflicting_claims {
            let flags = rules::conflicting_claims(person, &claims, &self.config.conflict_exempt_predicates);
            write_flags(store, FlagKind::ConflictingClaims, flags, summary)?;
        }
        Ok(())
    }

    fn spacing_flags<S: ClaimsStore>(
        &self,
        store: &S,
        child: PersonId,
        claims: &[Claim],
        births: &mut BirthCache,
    ) -> Result<Vec<Flag>, ValidationError>
    where
        S::Error: std::fmt::Display,
    {
        let Some(child_born) = rules::best_date(claims, Predicate::BornOn) else {
            return Ok(Vec::new());
        };

        let mut parents = Vec::new();
        for claim in claims.iter().filter(|c| c.predicate == Predicate::ChildOf) {
            let Some(claimed_parent) = claim.object_ref else {
                continue;
            };
            let Some(parent) = resolve_survivor(store, claimed_parent)? else {
                continue;
            };

            let born = match births.get(&parent) {
                Some(born) => *born,
                None => {
                    let parent_claims = store
                        .list_active_claims(&ClaimQuery::for_subject(parent).with_predicate(Predicate::BornOn))
                        .map_err(store_err)?;
                    let born = rules::best_date(&parent_claims, Predicate::BornOn);
                    births.insert(parent, born);
                    born
                }
            };

            if let Some(born) = born {
                parents.push(ParentBirth {
                    claim: claim.id,
                    claimed_parent,
                    parent,
                    born,
                });
            }
        }

        Ok(rules::generational_spacing(child, child_born, &parents, &self.config))
    }

    fn run_cycle_check<S: ClaimsStore>(
        &self,
        store: &mut S,
        summary: &mut ValidationSummary,
    ) -> Result<(), ValidationError>
    where
        S::Error: std::fmt::Display,
    {
        let claims = store
            .list_active_claims(&ClaimQuery::for_predicate(Predicate::ParentOf))
            .map_err(store_err)?;
        let graph = ParentGraph::from_claims(&claims);
        let hits = graph.find_cycles();

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            cycles = hits.len(),
            "checked parent graph"
        );
        for hit in &hits {
            tracing::warn!(root = %hit.root, length = hit.cycle.len(), "circular ancestry detected");
        }

        let flags = rules::circular_relationships(&hits, self.config.report_all_cycle_members);
        write_flags(store, FlagKind::CircularRelationship, flags, summary)
    }
}

/// Follow `merged_into` from `id` to the active record, if there is one
fn resolve_survivor<S: ClaimsStore>(store: &S, id: PersonId) -> Result<Option<PersonId>, ValidationError>
where
    S::Error: std::fmt::Display,
{
    let mut current = id;
    for _ in 0..MAX_MERGE_HOPS {
        match store.get_person(current).map_err(store_err)? {
            Some(person) if person.active => return Ok(Some(current)),
            Some(person) => match person.merged_into {
                Some(next) => current = next,
                None => return Ok(None),
            },
            None => {
                tracing::debug!(person = %current, "referenced parent has no person record");
                return Ok(None);
            }
        }
    }
    tracing::warn!(person = %id, hops = MAX_MERGE_HOPS, "merge chain too long, skipping parent");
    Ok(None)
}

fn write_flags<S: ClaimsStore>(
    store: &mut S,
    kind: FlagKind,
    flags: Vec<Flag>,
    summary: &mut ValidationSummary,
) -> Result<(), ValidationError>
where
    S::Error: std::fmt::Display,
{
    if flags.is_empty() {
        return Ok(());
    }

    store
        .atomically(|s| {
            for flag in &flags {
                s.create_flag(flag)?;
            }
            Ok(())
        })
        .map_err(store_err)?;

    for flag in &flags {
        tracing::debug!(
            kind = %flag.kind,
            severity = %flag.severity,
            entity = %flag.entity_uuid(),
            "{}",
            flag.message
        );
    }
    summary.record(kind, flags.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockStore;
    use lineage_domain::{Severity, SourceId};

    fn person(store: &mut MockStore, id: u128) -> PersonId {
        store.add_person(PersonId::from_value(id))
    }

    fn literal(store: &mut MockStore, subject: PersonId, predicate: Predicate, value: &str) {
        store.add_claim(Claim::literal(subject, predicate, value, SourceId::new(), 0.9));
    }

    fn relation(store: &mut MockStore, subject: PersonId, predicate: Predicate, object: PersonId) {
        store.add_claim(Claim::relation(subject, predicate, object, SourceId::new(), 0.9));
    }

    #[test]
    fn test_clean_person_raises_nothing() {
        let mut store = MockStore::new();
        let p = person(&mut store, 1);
        literal(&mut store, p, Predicate::HasName, "Ada Byron");
        literal(&mut store, p, Predicate::BornOn, "1815-12-10");
        literal(&mut store, p, Predicate::DiedOn, "1852-11-27");
        literal(&mut store, p, Predicate::MarriedOn, "1835-07-08");

        let summary = Validator::default_config().validate_all(&mut store).unwrap();
        assert_eq!(summary.persons_validated, 1);
        assert_eq!(summary.flags_created, 0);
        assert!(store.flags.is_empty());
    }

    #[test]
    fn test_spacing_follows_merged_parent() {
        let mut store = MockStore::new();
        let survivor = person(&mut store, 1);
        let absorbed = person(&mut store, 2);
        let child = person(&mut store, 3);
        store.absorb(absorbed, survivor);

        literal(&mut store, survivor, Predicate::BornOn, "1990");
        literal(&mut store, child, Predicate::BornOn, "1995");
        relation(&mut store, child, Predicate::ChildOf, absorbed);

        let summary = Validator::default_config().validate_all(&mut store).unwrap();
        assert_eq!(summary.count(FlagKind::GenerationalSpacingInvalid), 1);
        let flag = &store.flags[0];
        assert_eq!(flag.severity, Severity::Error);
        assert_eq!(flag.details["resolved_parent_id"], survivor.to_string());
    }

    #[test]
    fn test_missing_parent_record_is_skipped() {
        let mut store = MockStore::new();
        let child = person(&mut store, 1);
        literal(&mut store, child, Predicate::BornOn, "1995");
        relation(&mut store, child, Predicate::ChildOf, PersonId::from_value(99));

        let summary = Validator::default_config().validate_all(&mut store).unwrap();
        assert_eq!(summary.flags_created, 0);
    }

    #[test]
    fn test_disabled_rules_do_not_run() {
        let mut store = MockStore::new();
        let p = person(&mut store, 1);
        literal(&mut store, p, Predicate::BornOn, "1990");
        literal(&mut store, p, Predicate::DiedOn, "1980");
        literal(&mut store, p, Predicate::HasName, "A B");
        literal(&mut store, p, Predicate::HasName, "C D");

        let config = ValidationConfig {
            check_lifespan: false,
            check_conflicting_claims: false,
            ..Default::default()
        };
        let summary = Validator::new(config).unwrap().validate_all(&mut store).unwrap();
        assert_eq!(summary.flags_created, 0);
    }

    #[test]
    fn test_failed_batch_writes_nothing_for_that_rule() {
        let mut store = MockStore::new();
        let p = person(&mut store, 1);
        // two lifespan errors in one batch
        literal(&mut store, p, Predicate::BornOn, "1990");
        literal(&mut store, p, Predicate::DiedOn, "1980");
        literal(&mut store, p, Predicate::DiedOn, "1970");
        store.flag_capacity = Some(1);

        let result = Validator::default_config().validate_all(&mut store);
        assert!(matches!(result, Err(ValidationError::Store(_))));
        assert!(store.flags.is_empty());
    }

    #[test]
    fn test_validate_person_rejects_unknown_and_absorbed() {
        let mut store = MockStore::new();
        let a = person(&mut store, 1);
        let b = person(&mut store, 2);
        store.absorb(b, a);
        let validator = Validator::default_config();

        assert!(matches!(
            validator.validate_person(&mut store, PersonId::from_value(9)),
            Err(ValidationError::NotFound(_))
        ));
        assert!(matches!(
            validator.validate_person(&mut store, b),
            Err(ValidationError::NotFound(_))
        ));
        assert_eq!(validator.validate_person(&mut store, a).unwrap().persons_validated, 1);
    }

    #[test]
    fn test_report_all_cycle_members() {
        let mut store = MockStore::new();
        let a = person(&mut store, 1);
        let b = person(&mut store, 2);
        let c = person(&mut store, 3);
        relation(&mut store, a, Predicate::ParentOf, b);
        relation(&mut store, b, Predicate::ParentOf, c);
        relation(&mut store, c, Predicate::ParentOf, a);

        let summary = Validator::new(ValidationConfig::strict())
            .unwrap()
            .validate_all(&mut store)
            .unwrap();
        assert_eq!(summary.count(FlagKind::CircularRelationship), 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ValidationConfig {
            max_parent_gap_years: 5.0,
            ..Default::default()
        };
        assert!(matches!(Validator::new(config), Err(ValidationError::Config(_))));
    }
}
