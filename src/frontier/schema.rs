//! Database schema for the persistent frontier

/// SQL schema for the frontier database
pub const SCHEMA_SQL: &str = r#"
-- Every URL ever queued; rows are never deleted during a crawl
CREATE TABLE IF NOT EXISTS frontier_urls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    fetched INTEGER NOT NULL DEFAULT 0,
    discovered_at TEXT NOT NULL,
    fetched_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_frontier_urls_fetched ON frontier_urls(fetched, id);
"#;

/// Initializes the frontier schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
