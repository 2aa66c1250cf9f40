//! Administrative operations
//!
//! Used by the fixture loader and the inspection commands rather than by the engines.

use crate::{rows, SqliteStore, StoreError};
use lineage_domain::{Claim, ClaimId, Flag, FlagId, FlagKind, MergeEvent, Person, PersonId, Severity};
use rusqlite::{params, OptionalExtension};
use serde::Serialize;

/// Filter for listing flags
#[derive(Debug, Clone, Default)]
pub struct FlagQuery {
    /// Only flags of this kind
    pub kind: Option<FlagKind>,

    /// Only flags at or above this severity
    pub min_severity: Option<Severity>,

    /// Only flags pointing at this record
    pub entity_id: Option<u128>,

    /// Skip resolved flags
    pub unresolved_only: bool,

    /// Maximum results to return
    pub limit: Option<usize>,
}

/// Record counts for a store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    /// All person records
    pub persons: u64,
    /// Active person records
    pub active_persons: u64,
    /// All claims
    pub claims: u64,
    /// Active claims
    pub active_claims: u64,
    /// Merge audit records
    pub merge_events: u64,
    /// All flags
    pub flags: u64,
    /// Flags not yet resolved
    pub unresolved_flags: u64,
}

impl SqliteStore {
    /// Insert a person record
    pub fn insert_person(&mut self, person: &Person) -> Result<PersonId, StoreError> {
        if self.person_exists(person.id)? {
            return Err(StoreError::Duplicate(format!("person {}", person.id)));
        }

        self.conn.execute(
            "INSERT INTO persons (id, is_active, merged_into, canonical_name, canonical_birth_year,
             canonical_death_year, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                person.id.to_bytes(),
                person.active,
                person.merged_into.map(|p| p.to_bytes()),
                person.canonical.name,
                person.canonical.birth_year,
                person.canonical.death_year,
                person.created_at as i64,
                person.updated_at as i64,
            ],
        )?;

        Ok(person.id)
    }

    /// Insert a claim after checking its invariants
    ///
    /// The subject must already exist.
    pub fn insert_claim(&mut self, claim: &Claim) -> Result<ClaimId, StoreError> {
        claim.check().map_err(|e| StoreError::Invariant(e.to_string()))?;

        if !self.person_exists(claim.subject)? {
            return Err(StoreError::NotFound(format!("subject person {}", claim.subject)));
        }

        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM claims WHERE id = ?1",
                params![claim.id.to_bytes()],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        if exists {
            return Err(StoreError::Duplicate(format!("claim {}", claim.id)));
        }

        self.conn.execute(
            "INSERT INTO claims (id, subject_id, predicate, object_ref, object_value, place_id,
             time_start, time_end, source_id, confidence, tier, rationale, is_active,
             superseded_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                claim.id.to_bytes(),
                claim.subject.to_bytes(),
                claim.predicate.as_str(),
                claim.object_ref.map(|p| p.to_bytes()),
                claim.object_value,
                claim.place.map(|p| p.to_bytes()),
                claim.time_start,
                claim.time_end,
                claim.source.to_bytes(),
                claim.confidence,
                claim.tier.as_str(),
                claim.rationale,
                claim.active,
                claim.superseded_by.map(|c| c.to_bytes()),
                claim.created_at as i64,
            ],
        )?;

        Ok(claim.id)
    }

    /// Get a claim by id, active or not
    pub fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, StoreError> {
        let sql = format!("SELECT {} FROM claims WHERE id = ?1", rows::CLAIM_COLUMNS);
        let claim = self
            .conn
            .query_row(&sql, params![id.to_bytes()], rows::claim_from_row)
            .optional()?;
        Ok(claim)
    }

    /// Most recent merge events first
    pub fn list_merge_events(&self, limit: Option<usize>) -> Result<Vec<MergeEvent>, StoreError> {
        let mut sql = format!(
            "SELECT {} FROM merge_events ORDER BY created_at DESC, id DESC",
            rows::MERGE_EVENT_COLUMNS
        );
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let events = stmt
            .query_map([], rows::merge_event_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    /// Flags matching the query, most severe first
    pub fn list_flags(&self, query: &FlagQuery) -> Result<Vec<Flag>, StoreError> {
        let mut sql = format!("SELECT {} FROM flags WHERE 1=1", rows::FLAG_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(kind) = query.kind {
            sql.push_str(" AND kind = ?");
            params.push(Box::new(kind.as_str()));
        }

        if let Some(min) = query.min_severity {
            sql.push_str(" AND severity_rank >= ?");
            params.push(Box::new(rows::severity_rank(min)));
        }

        if let Some(entity_id) = query.entity_id {
            sql.push_str(" AND entity_id = ?");
            params.push(Box::new(entity_id.to_be_bytes()));
        }

        if query.unresolved_only {
            sql.push_str(" AND is_resolved = 0");
        }

        sql.push_str(" ORDER BY severity_rank DESC, id");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit as i64));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let flags = stmt
            .query_map(&param_refs[..], rows::flag_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(flags)
    }

    /// Get a flag by id
    pub fn get_flag(&self, id: FlagId) -> Result<Option<Flag>, StoreError> {
        let sql = format!("SELECT {} FROM flags WHERE id = ?1", rows::FLAG_COLUMNS);
        let flag = self
            .conn
            .query_row(&sql, params![id.to_bytes()], rows::flag_from_row)
            .optional()?;
        Ok(flag)
    }

    /// Mark a flag resolved with operator notes
    pub fn resolve_flag(&mut self, id: FlagId, notes: Option<&str>) -> Result<Flag, StoreError> {
        let updated = self.conn.execute(
            "UPDATE flags SET is_resolved = 1, resolved_at = ?1, resolution_notes = ?2
             WHERE id = ?3 AND is_resolved = 0",
            params![lineage_domain::unix_now() as i64, notes, id.to_bytes()],
        )?;

        let flag = self
            .get_flag(id)?
            .ok_or_else(|| StoreError::NotFound(format!("flag {}", id)))?;

        if updated == 0 {
            return Err(StoreError::Invariant(format!("flag {} is already resolved", id)));
        }
        Ok(flag)
    }

    /// Record counts across all tables
    pub fn counts(&self) -> Result<StoreCounts, StoreError> {
        let count = |sql: &str| -> Result<u64, StoreError> {
            let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
            Ok(n.max(0) as u64)
        };

        Ok(StoreCounts {
            persons: count("SELECT COUNT(*) FROM persons")?,
            active_persons: count("SELECT COUNT(*) FROM persons WHERE is_active = 1")?,
            claims: count("SELECT COUNT(*) FROM claims")?,
            active_claims: count("SELECT COUNT(*) FROM claims WHERE is_active = 1")?,
            merge_events: count("SELECT COUNT(*) FROM merge_events")?,
            flags: count("SELECT COUNT(*) FROM flags")?,
            unresolved_flags: count("SELECT COUNT(*) FROM flags WHERE is_resolved = 0")?,
        })
    }

    fn person_exists(&self, id: PersonId) -> Result<bool, StoreError> {
        Ok(self.is_active_person(id)?.is_some())
    }
}
