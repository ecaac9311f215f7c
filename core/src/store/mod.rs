//! SQLite run history.
//!
//! RULE: Only the store talks to the database.
//! The pipeline never touches SQL; callers persist a finished report.

use crate::error::IrfResult;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

mod report;

pub struct IrfStore {
    conn: Connection,
}

impl IrfStore {
    /// Open (or create) the history database at `path`.
    pub fn open(path: &str) -> IrfResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; in-memory ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> IrfResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> IrfResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, as_of: NaiveDate, version: &str) -> IrfResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, as_of, version, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                run_id,
                as_of.to_string(),
                version,
                chrono::Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Reference date a run was scored against, if the run exists.
    pub fn run_as_of(&self, run_id: &str) -> IrfResult<Option<String>> {
        let as_of = self
            .conn
            .query_row(
                "SELECT as_of FROM run WHERE run_id = ?1",
                params![run_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(as_of)
    }

    pub fn run_count(&self) -> IrfResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM run", [], |row| row.get(0))?;
        Ok(count)
    }
}
