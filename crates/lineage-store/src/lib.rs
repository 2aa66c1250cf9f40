//! LineageForge Storage Layer
//!
//! Implements the [`ClaimsStore`] trait on SQLite.
//!
//! # Architecture
//!
//! - One SQLite connection per store; ids are stored as 16-byte big-endian blobs so
//!   `ORDER BY id` matches the ascending id order both engines iterate in
//! - [`ClaimsStore::atomically`] wraps a closure in an immediate transaction; nested
//!   calls join the outer transaction, and an error or panic in the closure rolls back
//! - Administrative operations (loading fixtures, listing audit records, resolving
//!   flags) are inherent methods, see [`admin`]
//!
//! # Examples
//!
//! ```no_run
//! use lineage_store::SqliteStore;
//!
//! let store = SqliteStore::new("lineage.db").unwrap();
//! // Store is now ready for person and claim operations
//! ```

#![warn(missing_docs)]

pub mod admin;
mod rows;

pub use admin::{FlagQuery, StoreCounts};

use lineage_domain::traits::{ClaimQuery, ClaimsStore};
use lineage_domain::{CanonicalFields, Claim, ClaimId, Flag, MergeEvent, Person, PersonId};
use rusqlite::{params, Connection, OptionalExtension};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Referenced record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A write would break a data-model invariant
    #[error("Invariant violation: {0}")]
    Invariant(String),

    /// Record with the same id already stored
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// JSON column could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// SQLite-based implementation of ClaimsStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use lineage_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("lineage.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open a fresh in-memory store
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::new(":memory:")
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        tracing::debug!("claims store schema ready");
        Ok(())
    }

    fn is_active_person(&self, id: PersonId) -> Result<Option<bool>, StoreError> {
        let active = self
            .conn
            .query_row(
                "SELECT is_active FROM persons WHERE id = ?1",
                params![id.to_bytes()],
                |row| row.get::<_, bool>(0),
            )
            .optional()?;
        Ok(active)
    }

    fn rollback(&self) {
        if self.conn.is_autocommit() {
            return;
        }
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            tracing::warn!("rollback failed: {}", e);
        }
    }
}

impl ClaimsStore for SqliteStore {
    type Error = StoreError;

    fn list_active_persons(&self) -> Result<Vec<Person>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM persons WHERE is_active = 1 ORDER BY id",
            rows::PERSON_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let persons = stmt
            .query_map([], rows::person_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(persons)
    }

    fn get_person(&self, id: PersonId) -> Result<Option<Person>, Self::Error> {
        let sql = format!("SELECT {} FROM persons WHERE id = ?1", rows::PERSON_COLUMNS);
        let person = self
            .conn
            .query_row(&sql, params![id.to_bytes()], rows::person_from_row)
            .optional()?;
        Ok(person)
    }

    fn list_active_claims(&self, query: &ClaimQuery) -> Result<Vec<Claim>, Self::Error> {
        let mut sql = format!(
            "SELECT {} FROM claims WHERE is_active = 1",
            rows::CLAIM_COLUMNS
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(subject) = query.subject {
            sql.push_str(" AND subject_id = ?");
            params.push(Box::new(subject.to_bytes()));
        }

        if let Some(predicate) = query.predicate {
            sql.push_str(" AND predicate = ?");
            params.push(Box::new(predicate.as_str()));
        }

        sql.push_str(" ORDER BY id");

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let claims = stmt
            .query_map(&param_refs[..], rows::claim_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(claims)
    }

    fn deactivate_person(&mut self, id: PersonId, merged_into: PersonId) -> Result<(), Self::Error> {
        if id == merged_into {
            return Err(StoreError::Invariant(format!(
                "person {} cannot be merged into itself",
                id
            )));
        }

        match self.is_active_person(merged_into)? {
            None => return Err(StoreError::NotFound(format!("person {}", merged_into))),
            Some(false) => {
                return Err(StoreError::Invariant(format!(
                    "merge target {} is not active",
                    merged_into
                )))
            }
            Some(true) => {}
        }

        let updated = self.conn.execute(
            "UPDATE persons SET is_active = 0, merged_into = ?1, updated_at = ?2
             WHERE id = ?3 AND is_active = 1",
            params![
                merged_into.to_bytes(),
                lineage_domain::unix_now() as i64,
                id.to_bytes()
            ],
        )?;

        if updated == 0 {
            return match self.is_active_person(id)? {
                None => Err(StoreError::NotFound(format!("person {}", id))),
                Some(_) => Err(StoreError::Invariant(format!("person {} is already inactive", id))),
            };
        }

        Ok(())
    }

    fn redirect_merged_into(&mut self, from: PersonId, to: PersonId) -> Result<usize, Self::Error> {
        let updated = self.conn.execute(
            "UPDATE persons SET merged_into = ?1, updated_at = ?2
             WHERE merged_into = ?3 AND is_active = 0 AND id <> ?1",
            params![to.to_bytes(), lineage_domain::unix_now() as i64, from.to_bytes()],
        )?;
        Ok(updated)
    }

    fn reassign_claim_subject(&mut self, claim_id: ClaimId, new_subject: PersonId) -> Result<(), Self::Error> {
        if self.is_active_person(new_subject)?.is_none() {
            return Err(StoreError::NotFound(format!("person {}", new_subject)));
        }

        let updated = self.conn.execute(
            "UPDATE claims SET subject_id = ?1 WHERE id = ?2",
            params![new_subject.to_bytes(), claim_id.to_bytes()],
        )?;

        if updated == 0 {
            return Err(StoreError::NotFound(format!("claim {}", claim_id)));
        }
        Ok(())
    }

    fn update_canonical_fields(&mut self, id: PersonId, fields: &CanonicalFields) -> Result<(), Self::Error> {
        let updated = self.conn.execute(
            "UPDATE persons SET canonical_name = ?1, canonical_birth_year = ?2,
             canonical_death_year = ?3, updated_at = ?4 WHERE id = ?5",
            params![
                fields.name,
                fields.birth_year,
                fields.death_year,
                lineage_domain::unix_now() as i64,
                id.to_bytes()
            ],
        )?;

        if updated == 0 {
            return Err(StoreError::NotFound(format!("person {}", id)));
        }
        Ok(())
    }

    fn create_merge_event(&mut self, event: &MergeEvent) -> Result<(), Self::Error> {
        let features = serde_json::to_string(&event.features)?;

        self.conn.execute(
            "INSERT INTO merge_events (id, source_person_id, target_person_id, confidence_score,
             features, rationale, method, performed_by, run_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                event.id.to_bytes(),
                event.source.to_bytes(),
                event.target.to_bytes(),
                event.confidence_score,
                features,
                event.rationale,
                event.method.as_str(),
                event.performed_by,
                event.run_id.map(|r| r.to_bytes()),
                event.created_at as i64,
            ],
        )?;

        Ok(())
    }

    fn create_flag(&mut self, flag: &Flag) -> Result<(), Self::Error> {
        let details = serde_json::to_string(&flag.details)?;

        self.conn.execute(
            "INSERT INTO flags (id, kind, severity, severity_rank, entity_type, entity_id, message,
             details, is_resolved, resolved_at, resolution_notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                flag.id.to_bytes(),
                flag.kind.as_str(),
                flag.severity.as_str(),
                rows::severity_rank(flag.severity),
                flag.entity_kind.as_str(),
                flag.entity_id.to_be_bytes(),
                flag.message,
                details,
                flag.resolved,
                flag.resolved_at.map(|t| t as i64),
                flag.resolution_notes,
                flag.created_at as i64,
            ],
        )?;

        Ok(())
    }

    fn atomically<R, F>(&mut self, f: F) -> Result<R, Self::Error>
    where
        F: FnOnce(&mut Self) -> Result<R, Self::Error>,
    {
        // Already inside a transaction: join it
        if !self.conn.is_autocommit() {
            return f(self);
        }

        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        // f needs the whole store, so no Transaction guard can be held across it
        match panic::catch_unwind(AssertUnwindSafe(|| f(self))) {
            Ok(Ok(value)) => match self.conn.execute_batch("COMMIT") {
                Ok(()) => Ok(value),
                Err(e) => {
                    self.rollback();
                    Err(e.into())
                }
            },
            Ok(Err(e)) => {
                self.rollback();
                Err(e)
            }
            Err(payload) => {
                self.rollback();
                panic::resume_unwind(payload)
            }
        }
    }
}
