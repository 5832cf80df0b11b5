//! SQLite-backed match store.
//!
//! One row per match. Placement and fingerprint history are stored as JSON
//! text; the history is never pruned.

use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use hounds_core::{Fingerprint, Match, MatchId, Phase, PieceKind, Placement, Player, PlayerId};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::store::StoreError;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS matches (
    id TEXT NOT NULL PRIMARY KEY,
    creator_id TEXT NOT NULL,
    creator_kind TEXT NOT NULL,
    second_id TEXT,
    second_kind TEXT,
    phase TEXT NOT NULL,
    placement TEXT NOT NULL,
    history TEXT NOT NULL
)";

/// Raw column values of one row, in schema order after the id.
struct Row {
    creator_id: String,
    creator_kind: String,
    second_id: Option<String>,
    second_kind: Option<String>,
    phase: String,
    placement: String,
    history: String,
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened sqlite match store");
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(SCHEMA, [])?;
        Ok(SqliteStore { conn: Mutex::new(conn) })
    }

    pub fn insert(&self, m: &Match) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        let exists = conn
            .query_row("SELECT 1 FROM matches WHERE id = ?1", [m.id().to_string()], |_| Ok(()))
            .optional()?;
        if exists.is_some() {
            return Err(StoreError::Duplicate(m.id()));
        }

        let second = m.second();
        conn.execute(
            "INSERT INTO matches (id, creator_id, creator_kind, second_id, second_kind, phase, placement, history)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                m.id().to_string(),
                m.creator().id.to_string(),
                m.creator().kind.as_str(),
                second.map(|p| p.id.to_string()),
                second.map(|p| p.kind.as_str()),
                m.phase().as_str(),
                serde_json::to_string(m.placement())?,
                serde_json::to_string(m.history())?,
            ],
        )?;
        Ok(())
    }

    pub fn load(&self, id: MatchId) -> Result<Match, StoreError> {
        let conn = self.conn.lock();
        load_match(&conn, id)
    }

    pub fn update<T, E>(&self, id: MatchId, f: impl FnOnce(&mut Match) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(StoreError::from)?;

        let mut m = load_match(&tx, id)?;
        // Dropping the transaction on the error path rolls it back.
        let out = f(&mut m)?;
        save_match(&tx, &m)?;

        tx.commit().map_err(StoreError::from)?;
        Ok(out)
    }
}

fn load_match(conn: &Connection, id: MatchId) -> Result<Match, StoreError> {
    let row = conn
        .query_row(
            "SELECT creator_id, creator_kind, second_id, second_kind, phase, placement, history
             FROM matches WHERE id = ?1",
            [id.to_string()],
            |row| {
                Ok(Row {
                    creator_id: row.get(0)?,
                    creator_kind: row.get(1)?,
                    second_id: row.get(2)?,
                    second_kind: row.get(3)?,
                    phase: row.get(4)?,
                    placement: row.get(5)?,
                    history: row.get(6)?,
                })
            },
        )
        .optional()?
        .ok_or(StoreError::NotFound(id))?;

    decode(id, row)
}

fn save_match(conn: &Connection, m: &Match) -> Result<(), StoreError> {
    let second = m.second();
    conn.execute(
        "UPDATE matches
         SET second_id = ?2, second_kind = ?3, phase = ?4, placement = ?5, history = ?6
         WHERE id = ?1",
        params![
            m.id().to_string(),
            second.map(|p| p.id.to_string()),
            second.map(|p| p.kind.as_str()),
            m.phase().as_str(),
            serde_json::to_string(m.placement())?,
            serde_json::to_string(m.history())?,
        ],
    )?;
    Ok(())
}

fn decode(id: MatchId, row: Row) -> Result<Match, StoreError> {
    let creator = Player {
        id: parse(id, "creator_id", &row.creator_id)?,
        kind: parse(id, "creator_kind", &row.creator_kind)?,
    };
    let second = match (row.second_id, row.second_kind) {
        (Some(pid), Some(kind)) => Some(Player {
            id: parse::<PlayerId>(id, "second_id", &pid)?,
            kind: parse::<PieceKind>(id, "second_kind", &kind)?,
        }),
        (None, None) => None,
        _ => {
            return Err(StoreError::Corrupt {
                id: id.to_string(),
                reason: "second player is half-bound".to_string(),
            })
        }
    };
    let phase: Phase = parse(id, "phase", &row.phase)?;
    let placement: Placement = serde_json::from_str(&row.placement)?;
    let history: Vec<Fingerprint> = serde_json::from_str(&row.history)?;

    Ok(Match::from_parts(id, phase, creator, second, placement, history)?)
}

fn parse<T>(id: MatchId, field: &str, value: &str) -> Result<T, StoreError>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().map_err(|e| StoreError::Corrupt {
        id: id.to_string(),
        reason: format!("{field}: {e}"),
    })
}
