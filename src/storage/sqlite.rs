//! SQLite state store implementation

use crate::crawler::PageItem;
use crate::state::{CrawlState, VisitState};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{StateStore, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus};
use crate::structure::SiteStructure;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite-backed crawl state store
pub struct SqliteStateStore {
    conn: Connection,
}

impl SqliteStateStore {
    /// Opens (or creates) the state database at the given path
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory store (for testing)
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl StateStore for SqliteStateStore {
    fn load(&self) -> StorageResult<Option<CrawlState>> {
        let mut stmt = self.conn.prepare(
            "SELECT path, name, url, visit_state FROM nodes ORDER BY position",
        )?;
        let rows: Vec<(String, String, Option<String>, String)> = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<Result<_, _>>()?;

        let Some((root_path, root_name, _, root_state)) = rows.first() else {
            return Ok(None);
        };
        if !root_path.is_empty() {
            return Err(StorageError::Corrupt(format!(
                "first node row has path '{}', expected the root",
                root_path
            )));
        }

        let mut structure = SiteStructure::new(root_name);
        let root_state = parse_visit_state(root_state)?;
        structure.set_visit_state(structure.root(), root_state, false);

        // Rows are stored in pre-order, so each node's own row is replayed
        // before any of its descendants and sibling order is preserved.
        for (path, _, url, state) in rows.iter().skip(1) {
            let id = structure.ensure_path(path);
            if let Some(url) = url {
                structure.set_url(id, url);
            }
            let state = parse_visit_state(state)?;
            structure.set_visit_state(id, state, false);
        }

        let cursor: Option<(Option<String>, Option<String>)> = self
            .conn
            .query_row(
                "SELECT current_leaf_path, current_page_url FROM cursor WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let (current_leaf_path, current_page_url) = cursor.unwrap_or((None, None));

        Ok(Some(CrawlState {
            site_structure: structure,
            current_leaf_path,
            current_page_url,
        }))
    }

    fn save(&mut self, state: &CrawlState) -> StorageResult<()> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM nodes", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO nodes (position, path, name, url, visit_state)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            let structure = &state.site_structure;
            for (position, id) in structure.preorder().into_iter().enumerate() {
                let node = structure.node(id);
                insert.execute(params![
                    position as i64,
                    structure.path_of(id),
                    node.name,
                    node.url,
                    node.visit_state.to_db_string(),
                ])?;
            }
        }

        let now = Utc::now().to_rfc3339();
        tx.execute(
            "INSERT INTO cursor (id, current_leaf_path, current_page_url, saved_at)
             VALUES (1, ?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                 current_leaf_path = excluded.current_leaf_path,
                 current_page_url = excluded.current_page_url,
                 saved_at = excluded.saved_at",
            params![state.current_leaf_path, state.current_page_url, now],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM nodes", [])?;
        tx.execute("DELETE FROM cursor", [])?;
        tx.execute("DELETE FROM items", [])?;
        tx.commit()?;
        Ok(())
    }

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, started_at, finished_at, config_hash, status
             FROM runs ORDER BY id DESC LIMIT 1",
        )?;

        let run = stmt
            .query_row([], |row| {
                Ok(RunRecord {
                    id: row.get(0)?,
                    started_at: row.get(1)?,
                    finished_at: row.get(2)?,
                    config_hash: row.get(3)?,
                    status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
                        .unwrap_or(RunStatus::Running),
                })
            })
            .optional()?;

        Ok(run)
    }

    fn complete_run(&mut self, run_id: i64) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![RunStatus::Completed.to_db_string(), now, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn record_items(
        &mut self,
        run_id: i64,
        leaf_path: &str,
        items: &[PageItem],
    ) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO items (run_id, leaf_path, url, title, scraped_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            let now = Utc::now().to_rfc3339();
            for item in items {
                insert.execute(params![run_id, leaf_path, item.url, item.title, now])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn count_items(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn parse_visit_state(s: &str) -> StorageResult<VisitState> {
    VisitState::from_db_string(s)
        .ok_or_else(|| StorageError::Corrupt(format!("unknown visit state '{}'", s)))
}
