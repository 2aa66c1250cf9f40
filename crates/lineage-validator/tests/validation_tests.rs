//! End-to-end validation against a SQLite store

use lineage_domain::{Claim, EntityKind, FlagKind, Person, PersonId, Predicate, Severity, SourceId};
use lineage_store::{FlagQuery, SqliteStore};
use lineage_validator::{ValidationConfig, Validator};

struct Fixture {
    store: SqliteStore,
    source: SourceId,
}

impl Fixture {
    fn new() -> Self {
        Self {
            store: SqliteStore::in_memory().unwrap(),
            source: SourceId::new(),
        }
    }

    fn person(&mut self, id: u128) -> PersonId {
        self.store
            .insert_person(&Person::with_id(PersonId::from_value(id)))
            .unwrap()
    }

    fn literal(&mut self, subject: PersonId, predicate: Predicate, value: &str) -> Claim {
        let claim = Claim::literal(subject, predicate, value, self.source, 0.9);
        self.store.insert_claim(&claim).unwrap();
        claim
    }

    fn relation(&mut self, subject: PersonId, predicate: Predicate, object: PersonId) -> Claim {
        let claim = Claim::relation(subject, predicate, object, self.source, 0.9);
        self.store.insert_claim(&claim).unwrap();
        claim
    }

    fn validate(&mut self) -> lineage_validator::ValidationSummary {
        Validator::default_config().validate_all(&mut self.store).unwrap()
    }

    fn flags(&self, kind: FlagKind) -> Vec<lineage_domain::Flag> {
        self.store
            .list_flags(&FlagQuery {
                kind: Some(kind),
                ..Default::default()
            })
            .unwrap()
    }
}

#[test]
fn test_death_before_birth_is_one_error() {
    let mut fx = Fixture::new();
    let p = fx.person(1);
    fx.literal(p, Predicate::BornOn, "1990-01-01");
    fx.literal(p, Predicate::DiedOn, "1980-01-01");

    let summary = fx.validate();
    assert_eq!(summary.flags_created, 1);

    let flags = fx.flags(FlagKind::LifespanInvalid);
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].severity, Severity::Error);
    assert_eq!(flags[0].entity_kind, EntityKind::Person);
    assert_eq!(flags[0].entity_id, p.value());
}

#[test]
fn test_unrealistic_lifespan_is_one_warning() {
    let mut fx = Fixture::new();
    let p = fx.person(1);
    fx.literal(p, Predicate::BornOn, "1900-01-01");
    fx.literal(p, Predicate::DiedOn, "2050-01-01");

    fx.validate();
    let flags = fx.flags(FlagKind::LifespanInvalid);
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].severity, Severity::Warning);
}

#[test]
fn test_ordinary_lifespan_raises_nothing() {
    let mut fx = Fixture::new();
    let p = fx.person(1);
    fx.literal(p, Predicate::BornOn, "1980-01-01");
    fx.literal(p, Predicate::DiedOn, "2020-01-01");

    assert_eq!(fx.validate().flags_created, 0);
}

#[test]
fn test_parent_five_years_older_is_spacing_error() {
    let mut fx = Fixture::new();
    let parent = fx.person(1);
    let child = fx.person(2);
    fx.literal(parent, Predicate::BornOn, "1990");
    fx.literal(child, Predicate::BornOn, "1995");
    let link = fx.relation(child, Predicate::ChildOf, parent);

    fx.validate();
    let flags = fx.flags(FlagKind::GenerationalSpacingInvalid);
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].severity, Severity::Error);
    assert_eq!(flags[0].entity_kind, EntityKind::Claim);
    assert_eq!(flags[0].entity_id, link.id.value());
    assert_eq!(flags[0].details["parent_id"], parent.to_string());
}

#[test]
fn test_spacing_checks_survivor_of_merged_parent() {
    let mut fx = Fixture::new();
    let survivor = fx.person(1);
    let mut absorbed = Person::with_id(PersonId::from_value(2));
    absorbed.active = false;
    absorbed.merged_into = Some(survivor);
    let absorbed = fx.store.insert_person(&absorbed).unwrap();
    let child = fx.person(3);

    fx.literal(survivor, Predicate::BornOn, "1900");
    fx.literal(child, Predicate::BornOn, "1980");
    fx.relation(child, Predicate::ChildOf, absorbed);

    fx.validate();
    let flags = fx.flags(FlagKind::GenerationalSpacingInvalid);
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].severity, Severity::Warning);
    assert_eq!(flags[0].details["resolved_parent_id"], survivor.to_string());
}

#[test]
fn test_two_distinct_names_give_one_conflict() {
    let mut fx = Fixture::new();
    let p = fx.person(1);
    fx.literal(p, Predicate::HasName, "Catherine Howard");
    fx.literal(p, Predicate::HasName, "Katheryn Howard");

    fx.validate();
    let flags = fx.flags(FlagKind::ConflictingClaims);
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].severity, Severity::Warning);
    assert_eq!(flags[0].details["claim_count"], 2);
    assert_eq!(flags[0].details["predicate"], "has_name");
}

#[test]
fn test_three_person_ancestry_loop_is_critical() {
    let mut fx = Fixture::new();
    let a = fx.person(1);
    let b = fx.person(2);
    let c = fx.person(3);
    fx.relation(a, Predicate::ParentOf, b);
    fx.relation(b, Predicate::ParentOf, c);
    fx.relation(c, Predicate::ParentOf, a);

    let summary = fx.validate();
    assert_eq!(summary.count(FlagKind::CircularRelationship), 1);

    let flags = fx.flags(FlagKind::CircularRelationship);
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].severity, Severity::Critical);
    assert_eq!(flags[0].entity_id, a.value());
    assert_eq!(flags[0].details["cycle"].as_array().unwrap().len(), 3);
}

#[test]
fn test_marriage_checks_fire_independently() {
    let mut fx = Fixture::new();
    let p = fx.person(1);
    fx.literal(p, Predicate::BornOn, "1900");
    fx.literal(p, Predicate::DiedOn, "1950");
    fx.literal(p, Predicate::MarriedOn, "1880");
    fx.literal(p, Predicate::MarriedOn, "1970");

    fx.validate();
    let mut messages: Vec<String> = fx
        .flags(FlagKind::TemporalImpossibility)
        .into_iter()
        .map(|f| f.message)
        .collect();
    messages.sort();
    assert_eq!(messages, vec!["Marriage after death", "Marriage before birth"]);
}

#[test]
fn test_malformed_dates_are_skipped_silently() {
    let mut fx = Fixture::new();
    let p = fx.person(1);
    fx.literal(p, Predicate::BornOn, "the year of the great frost");
    fx.literal(p, Predicate::DiedOn, "1850");
    fx.literal(p, Predicate::MarriedOn, "??");

    let summary = fx.validate();
    assert_eq!(summary.flags_created, 0);
}

#[test]
fn test_impossible_calendar_dates_raise_no_flags() {
    let mut fx = Fixture::new();
    let parent = fx.person(1);
    let child = fx.person(2);
    fx.literal(parent, Predicate::BornOn, "1850-01-15");
    fx.literal(parent, Predicate::DiedOn, "1900-01-01");
    fx.literal(parent, Predicate::MarriedOn, "1850-02-30");
    fx.literal(child, Predicate::BornOn, "31 Feb 1855");
    fx.literal(child, Predicate::DiedOn, "1850-13-01");
    fx.relation(child, Predicate::ChildOf, parent);

    let summary = fx.validate();
    assert_eq!(summary.flags_created, 0);
    assert!(fx.flags(FlagKind::TemporalImpossibility).is_empty());
    assert!(fx.flags(FlagKind::GenerationalSpacingInvalid).is_empty());
}

#[test]
fn test_fuzzy_dates_are_understood() {
    let mut fx = Fixture::new();
    let p = fx.person(1);
    fx.literal(p, Predicate::BornOn, "abt 1850");
    fx.literal(p, Predicate::DiedOn, "12 MAR 1840");

    fx.validate();
    assert_eq!(fx.flags(FlagKind::LifespanInvalid).len(), 1);
}

#[test]
fn test_merged_away_persons_are_not_validated() {
    let mut fx = Fixture::new();
    let survivor = fx.person(1);
    let mut absorbed = Person::with_id(PersonId::from_value(2));
    absorbed.active = false;
    absorbed.merged_into = Some(survivor);
    fx.store.insert_person(&absorbed).unwrap();

    let summary = fx.validate();
    assert_eq!(summary.persons_validated, 1);
}

#[test]
fn test_rerun_adds_a_second_copy_of_each_flag() {
    let mut fx = Fixture::new();
    let p = fx.person(1);
    fx.literal(p, Predicate::HasName, "A Person");
    fx.literal(p, Predicate::HasName, "Another Person");

    fx.validate();
    fx.validate();
    assert_eq!(fx.flags(FlagKind::ConflictingClaims).len(), 2);
}

#[test]
fn test_permissive_config_skips_conflicts() {
    let mut fx = Fixture::new();
    let p = fx.person(1);
    fx.literal(p, Predicate::HasName, "A Person");
    fx.literal(p, Predicate::HasName, "Another Person");

    let summary = Validator::new(ValidationConfig::permissive())
        .unwrap()
        .validate_all(&mut fx.store)
        .unwrap();
    assert_eq!(summary.flags_created, 0);
}
