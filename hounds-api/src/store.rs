//! Match storage.
//!
//! Every mutation goes through [`Store::update`], which runs one match
//! transition as a single atomic unit: under the match's lock in memory, or
//! inside one transaction in SQLite. A failed transition is never written.

use std::path::Path;

use hounds_core::{InconsistentMatch, Match, MatchId};
use thiserror::Error;

use crate::memory::MemoryStore;
use crate::sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("match {0} not found")]
    NotFound(MatchId),
    #[error("match {0} already exists")]
    Duplicate(MatchId),
    #[error("stored match {id} is corrupt: {reason}")]
    Corrupt { id: String, reason: String },
    #[error("stored match is inconsistent: {0}")]
    Inconsistent(#[from] InconsistentMatch),
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Backing store selected at startup.
pub enum Store {
    Memory(MemoryStore),
    Sqlite(SqliteStore),
}

impl Store {
    /// Open a SQLite store at `path`, or an in-memory one when None.
    pub fn open(path: Option<&Path>) -> Result<Store, StoreError> {
        match path {
            Some(path) => Ok(Store::Sqlite(SqliteStore::open(path)?)),
            None => Ok(Store::Memory(MemoryStore::new())),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Store::Memory(_) => "memory",
            Store::Sqlite(_) => "sqlite",
        }
    }

    pub fn insert(&self, m: &Match) -> Result<(), StoreError> {
        match self {
            Store::Memory(s) => s.insert(m),
            Store::Sqlite(s) => s.insert(m),
        }
    }

    pub fn load(&self, id: MatchId) -> Result<Match, StoreError> {
        match self {
            Store::Memory(s) => s.load(id),
            Store::Sqlite(s) => s.load(id),
        }
    }

    /// Run `f` against the stored match and persist the result if it succeeds.
    pub fn update<T, E>(&self, id: MatchId, f: impl FnOnce(&mut Match) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        match self {
            Store::Memory(s) => s.update(id, f),
            Store::Sqlite(s) => s.update(id, f),
        }
    }
}
