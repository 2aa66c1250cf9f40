//! Row decoding

use lineage_domain::{
    CanonicalFields, Claim, ClaimId, ConfidenceTier, EntityKind, FeatureScores, Flag, FlagId,
    FlagKind, MergeEvent, MergeEventId, MergeMethod, Person, PersonId, PlaceId, Predicate, RunId,
    Severity, SourceId,
};
use rusqlite::types::Type;
use rusqlite::Row;

pub(crate) const PERSON_COLUMNS: &str = "id, is_active, merged_into, canonical_name, \
     canonical_birth_year, canonical_death_year, created_at, updated_at";

pub(crate) const CLAIM_COLUMNS: &str = "id, subject_id, predicate, object_ref, object_value, \
     place_id, time_start, time_end, source_id, confidence, tier, rationale, is_active, \
     superseded_by, created_at";

pub(crate) const MERGE_EVENT_COLUMNS: &str = "id, source_person_id, target_person_id, \
     confidence_score, features, rationale, method, performed_by, run_id, created_at";

pub(crate) const FLAG_COLUMNS: &str = "id, kind, severity, entity_type, entity_id, message, \
     details, is_resolved, resolved_at, resolution_notes, created_at";

pub(crate) fn severity_rank(severity: Severity) -> i64 {
    match severity {
        Severity::Info => 0,
        Severity::Warning => 1,
        Severity::Error => 2,
        Severity::Critical => 3,
    }
}

fn conversion_error(idx: usize, ty: Type, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, msg.into())
}

fn id_col<T>(row: &Row<'_>, idx: usize, decode: fn(&[u8]) -> Result<T, String>) -> rusqlite::Result<T> {
    let bytes: Vec<u8> = row.get(idx)?;
    decode(&bytes).map_err(|e| conversion_error(idx, Type::Blob, e))
}

fn opt_id_col<T>(
    row: &Row<'_>,
    idx: usize,
    decode: fn(&[u8]) -> Result<T, String>,
) -> rusqlite::Result<Option<T>> {
    let bytes: Option<Vec<u8>> = row.get(idx)?;
    bytes
        .map(|b| decode(&b).map_err(|e| conversion_error(idx, Type::Blob, e)))
        .transpose()
}

fn text_col<T>(row: &Row<'_>, idx: usize, what: &str, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    parse(&text).ok_or_else(|| conversion_error(idx, Type::Text, format!("Unknown {}: {}", what, text)))
}

fn json_col<T: serde::de::DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text).map_err(|e| conversion_error(idx, Type::Text, e.to_string()))
}

fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    Ok(row.get::<_, i64>(idx)?.max(0) as u64)
}

pub(crate) fn person_from_row(row: &Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person {
        id: id_col(row, 0, PersonId::from_bytes)?,
        active: row.get(1)?,
        merged_into: opt_id_col(row, 2, PersonId::from_bytes)?,
        canonical: CanonicalFields {
            name: row.get(3)?,
            birth_year: row.get(4)?,
            death_year: row.get(5)?,
        },
        created_at: timestamp(row, 6)?,
        updated_at: timestamp(row, 7)?,
    })
}

pub(crate) fn claim_from_row(row: &Row<'_>) -> rusqlite::Result<Claim> {
    Ok(Claim {
        id: id_col(row, 0, ClaimId::from_bytes)?,
        subject: id_col(row, 1, PersonId::from_bytes)?,
        predicate: text_col(row, 2, "predicate", Predicate::parse)?,
        object_ref: opt_id_col(row, 3, PersonId::from_bytes)?,
        object_value: row.get(4)?,
        place: opt_id_col(row, 5, PlaceId::from_bytes)?,
        time_start: row.get(6)?,
        time_end: row.get(7)?,
        source: id_col(row, 8, SourceId::from_bytes)?,
        confidence: row.get(9)?,
        tier: text_col(row, 10, "tier", ConfidenceTier::parse)?,
        rationale: row.get(11)?,
        active: row.get(12)?,
        superseded_by: opt_id_col(row, 13, ClaimId::from_bytes)?,
        created_at: timestamp(row, 14)?,
    })
}

pub(crate) fn merge_event_from_row(row: &Row<'_>) -> rusqlite::Result<MergeEvent> {
    let features: FeatureScores = json_col(row, 4)?;

    Ok(MergeEvent {
        id: id_col(row, 0, MergeEventId::from_bytes)?,
        source: id_col(row, 1, PersonId::from_bytes)?,
        target: id_col(row, 2, PersonId::from_bytes)?,
        confidence_score: row.get(3)?,
        features,
        rationale: row.get(5)?,
        method: text_col(row, 6, "merge method", MergeMethod::parse)?,
        performed_by: row.get(7)?,
        run_id: opt_id_col(row, 8, RunId::from_bytes)?,
        created_at: timestamp(row, 9)?,
    })
}

pub(crate) fn flag_from_row(row: &Row<'_>) -> rusqlite::Result<Flag> {
    let entity_bytes: Vec<u8> = row.get(4)?;
    let entity_id: [u8; 16] = entity_bytes.as_slice().try_into().map_err(|_| {
        conversion_error(4, Type::Blob, format!("Expected 16 bytes, got {}", entity_bytes.len()))
    })?;
    let resolved_at: Option<i64> = row.get(8)?;

    Ok(Flag {
        id: id_col(row, 0, FlagId::from_bytes)?,
        kind: text_col(row, 1, "flag kind", FlagKind::parse)?,
        severity: text_col(row, 2, "severity", Severity::parse)?,
        entity_kind: text_col(row, 3, "entity type", EntityKind::parse)?,
        entity_id: u128::from_be_bytes(entity_id),
        message: row.get(5)?,
        details: json_col(row, 6)?,
        resolved: row.get(7)?,
        resolved_at: resolved_at.map(|t| t.max(0) as u64),
        resolution_notes: row.get(9)?,
        created_at: timestamp(row, 10)?,
    })
}
