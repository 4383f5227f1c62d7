//! SQLite-backed frontier
//!
//! Every queued URL gets a row; popping marks the row fetched instead of
//! deleting it, so the table doubles as the seen set and survives restarts.

use crate::frontier::schema::initialize_schema;
use crate::frontier::{Frontier, FrontierResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Persistent FIFO frontier
pub struct SqliteFrontier {
    conn: Connection,
}

impl SqliteFrontier {
    /// Opens or creates the frontier database at `path`
    ///
    /// Existing rows are kept; call [`SqliteFrontier::clear`] to start over.
    pub fn open(path: &Path) -> FrontierResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> FrontierResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Deletes every queued and fetched URL
    pub fn clear(&mut self) -> FrontierResult<()> {
        self.conn.execute("DELETE FROM frontier_urls", [])?;
        Ok(())
    }

    fn count_where(&self, fetched: bool) -> FrontierResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM frontier_urls WHERE fetched = ?1",
            params![fetched],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

impl Frontier for SqliteFrontier {
    fn has_next(&self) -> FrontierResult<bool> {
        let next: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM frontier_urls WHERE fetched = 0 LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(next.is_some())
    }

    fn next_url(&mut self) -> FrontierResult<Option<String>> {
        let tx = self.conn.transaction()?;

        let next: Option<(i64, String)> = tx
            .query_row(
                "SELECT id, url FROM frontier_urls WHERE fetched = 0 ORDER BY id LIMIT 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        if let Some((id, _)) = &next {
            let now = Utc::now().to_rfc3339();
            tx.execute(
                "UPDATE frontier_urls SET fetched = 1, fetched_at = ?1 WHERE id = ?2",
                params![now, id],
            )?;
        }

        tx.commit()?;
        Ok(next.map(|(_, url)| url))
    }

    fn add_url(&mut self, url: &str) -> FrontierResult<bool> {
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO frontier_urls (url, discovered_at) VALUES (?1, ?2)",
            params![url, now],
        )?;
        Ok(inserted > 0)
    }

    fn has_seen(&self, url: &str) -> FrontierResult<bool> {
        let id: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM frontier_urls WHERE url = ?1",
                params![url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id.is_some())
    }

    fn fetched_count(&self) -> FrontierResult<u64> {
        self.count_where(true)
    }

    fn len(&self) -> FrontierResult<u64> {
        self.count_where(false)
    }
}
