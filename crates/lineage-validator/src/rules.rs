//! Rule evaluators
//!
//! Each rule is a pure function from already-loaded claims to the flags it raises;
//! the validator does the reading and writing.

use crate::cycle::CycleHit;
use crate::ValidationConfig;
use chrono::NaiveDate;
use lineage_domain::dates::{parse_fuzzy, years_between};
use lineage_domain::person::best_claim;
use lineage_domain::{Claim, ClaimId, EntityKind, Flag, FlagKind, PersonId, Predicate, Severity};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

/// Parse a claim's literal as a date; unparseable or missing dates are absent data
pub(crate) fn claim_date(claim: &Claim) -> Option<NaiveDate> {
    let raw = claim.literal_value()?;
    match parse_fuzzy(raw) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::trace!(claim = %claim.id, error = %e, "skipping unparseable date");
            None
        }
    }
}

/// Date of the highest-confidence claim for `predicate`
///
/// Only the best claim is consulted; a malformed best claim yields `None` even if a
/// weaker claim would parse.
pub(crate) fn best_date(claims: &[Claim], predicate: Predicate) -> Option<NaiveDate> {
    best_claim(claims, predicate).and_then(claim_date)
}

fn dated(claims: &[Claim], predicate: Predicate) -> impl Iterator<Item = (&Claim, NaiveDate)> {
    claims
        .iter()
        .filter(move |c| c.active && c.predicate == predicate)
        .filter_map(|c| claim_date(c).map(|d| (c, d)))
}

/// Every birth/death pair: death before birth, or an overlong life
pub(crate) fn lifespan(person: PersonId, claims: &[Claim], config: &ValidationConfig) -> Vec<Flag> {
    let births: Vec<(&Claim, NaiveDate)> = dated(claims, Predicate::BornOn).collect();
    let deaths: Vec<(&Claim, NaiveDate)> = dated(claims, Predicate::DiedOn).collect();

    let mut flags = Vec::new();
    for &(birth_claim, born) in &births {
        for &(death_claim, died) in &deaths {
            let years = years_between(born, died);
            let (severity, message) = if years < 0.0 {
                (Severity::Error, format!("Death date before birth date: {:.1} years", years))
            } else if years > config.max_lifespan_years {
                (Severity::Warning, format!("Unrealistic lifespan: {:.1} years", years))
            } else {
                continue;
            };

            flags.push(
                Flag::new(FlagKind::LifespanInvalid, severity, EntityKind::Person, person.value(), message)
                    .with_details(json!({
                        "birth_date": born.to_string(),
                        "death_date": died.to_string(),
                        "lifespan_years": years,
                        "birth_claim": birth_claim.id.to_string(),
                        "death_claim": death_claim.id.to_string(),
                    })),
            );
        }
    }
    flags
}

/// A `child_of` claim whose parent has a usable birth date
#[derive(Debug, Clone, Copy)]
pub(crate) struct ParentBirth {
    pub claim: ClaimId,
    pub claimed_parent: PersonId,
    pub parent: PersonId,
    pub born: NaiveDate,
}

/// Parent/child birth gaps outside `[min_parent_gap_years, max_parent_gap_years]`
pub(crate) fn generational_spacing(
    child: PersonId,
    child_born: NaiveDate,
    parents: &[ParentBirth],
    config: &ValidationConfig,
) -> Vec<Flag> {
    let mut flags = Vec::new();
    for parent in parents {
        let gap = years_between(parent.born, child_born);
        let (severity, message) = if gap < config.min_parent_gap_years {
            (Severity::Error, format!("Parent too young: {:.1} years", gap))
        } else if gap > config.max_parent_gap_years {
            (Severity::Warning, format!("Large age gap: {:.1} years", gap))
        } else {
            continue;
        };

        let mut details = json!({
            "person_id": child.to_string(),
            "parent_id": parent.claimed_parent.to_string(),
            "age_gap_years": gap,
        });
        if parent.parent != parent.claimed_parent {
            details["resolved_parent_id"] = json!(parent.parent.to_string());
        }

        flags.push(
            Flag::new(
                FlagKind::GenerationalSpacingInvalid,
                severity,
                EntityKind::Claim,
                parent.claim.value(),
                message,
            )
            .with_details(details),
        );
    }
    flags
}

/// Marriages dated before the best birth or after the best death
///
/// Both a birth and a death date must be known before any marriage is checked.
pub(crate) fn temporal_consistency(person: PersonId, claims: &[Claim]) -> Vec<Flag> {
    let (Some(born), Some(died)) = (
        best_date(claims, Predicate::BornOn),
        best_date(claims, Predicate::DiedOn),
    ) else {
        return Vec::new();
    };

    let mut flags = Vec::new();
    for (claim, married) in dated(claims, Predicate::MarriedOn) {
        if married < born {
            flags.push(
                Flag::new(
                    FlagKind::TemporalImpossibility,
                    Severity::Error,
                    EntityKind::Claim,
                    claim.id.value(),
                    "Marriage before birth",
                )
                .with_details(json!({
                    "person_id": person.to_string(),
                    "marriage_date": married.to_string(),
                    "birth_date": born.to_string(),
                })),
            );
        }
        if married > died {
            flags.push(
                Flag::new(
                    FlagKind::TemporalImpossibility,
                    Severity::Error,
                    EntityKind::Claim,
                    claim.id.value(),
                    "Marriage after death",
                )
                .with_details(json!({
                    "person_id": person.to_string(),
                    "marriage_date": married.to_string(),
                    "death_date": died.to_string(),
                })),
            );
        }
    }
    flags
}

/// One warning per predicate asserted with more than one distinct value
pub(crate) fn conflicting_claims(person: PersonId, claims: &[Claim], exempt: &[Predicate]) -> Vec<Flag> {
    let mut groups: BTreeMap<Predicate, (usize, BTreeSet<String>)> = BTreeMap::new();
    for claim in claims.iter().filter(|c| c.active && !exempt.contains(&c.predicate)) {
        let entry = groups.entry(claim.predicate).or_default();
        entry.0 += 1;
        if let Some(value) = claim.resolved_value() {
            entry.1.insert(value);
        }
    }

    groups
        .into_iter()
        .filter(|(_, (count, values))| *count > 1 && values.len() > 1)
        .map(|(predicate, (count, values))| {
            Flag::new(
                FlagKind::ConflictingClaims,
                Severity::Warning,
                EntityKind::Person,
                person.value(),
                format!("Conflicting claims for {}", predicate.as_str()),
            )
            .with_details(json!({
                "predicate": predicate.as_str(),
                "conflicting_values": values,
                "claim_count": count,
            }))
        })
        .collect()
}

/// Critical flags for detected cycles
pub(crate) fn circular_relationships(hits: &[CycleHit], report_all_members: bool) -> Vec<Flag> {
    let mut flagged = BTreeSet::new();
    let mut flags = Vec::new();

    for hit in hits {
        let cycle: Vec<String> = hit.cycle.iter().map(|id| id.to_string()).collect();
        let targets: Vec<PersonId> = if report_all_members {
            hit.cycle.clone()
        } else {
            vec![hit.root]
        };

        for node in targets {
            if !flagged.insert(node) {
                continue;
            }
            flags.push(
                Flag::new(
                    FlagKind::CircularRelationship,
                    Severity::Critical,
                    EntityKind::Person,
                    node.value(),
                    "Circular parent-child relationship detected",
                )
                .with_details(json!({
                    "node_id": node.to_string(),
                    "cycle": cycle,
                })),
            );
        }
    }
    flags
}
