//! Database schema definitions

/// SQL schema for the state database
pub const SCHEMA_SQL: &str = r#"
-- Track crawl runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL
);

-- Category tree snapshot, one row per node in pre-order.
-- The root row has an empty path; position preserves sibling order so a
-- reload rebuilds a structurally identical tree.
CREATE TABLE IF NOT EXISTS nodes (
    position INTEGER PRIMARY KEY,
    path TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    url TEXT,
    visit_state TEXT NOT NULL
);

-- Single-row traversal cursor
CREATE TABLE IF NOT EXISTS cursor (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    current_leaf_path TEXT,
    current_page_url TEXT,
    saved_at TEXT NOT NULL
);

-- Items scraped from leaf content pages
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    leaf_path TEXT NOT NULL,
    url TEXT NOT NULL,
    title TEXT,
    scraped_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_items_leaf ON items(leaf_path);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}
