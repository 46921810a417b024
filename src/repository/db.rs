//! Database Connection and Setup
//!
//! Manages the SQLite connection backing both store scopes, and migrations.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::sqlite_store::SqliteStore;
use super::traits::StoreScope;
use crate::domain::{DomainError, DomainResult};

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    pub conn: Arc<Mutex<Option<Connection>>>,
    path: PathBuf,
}

impl DbState {
    pub fn new(path: PathBuf) -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store view over one scope; shares this connection
    pub fn store(&self, scope: StoreScope) -> SqliteStore {
        SqliteStore::new(self.conn.clone(), scope)
    }

    pub async fn is_open(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Drop the connection; stores created from this state start failing
    pub async fn close(&self) {
        *self.conn.lock().await = None;
    }
}

/// Open (or create) the database at `db_path`. `:memory:` opens a private
/// in-memory database.
pub async fn init_db(db_path: &Path) -> DomainResult<DbState> {
    let conn = if db_path == Path::new(":memory:") {
        Connection::open_in_memory()?
    } else {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| DomainError::Storage(format!("Failed to create data dir: {}", e)))?;
        }
        Connection::open(db_path)?
    };

    run_migrations(&conn)?;

    let state = DbState::new(db_path.to_path_buf());
    *state.conn.lock().await = Some(conn);
    Ok(state)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let query = format!("PRAGMA table_info({})", table);
    let Ok(mut stmt) = conn.prepare(&query) else {
        return false;
    };
    let Ok(mut rows) = stmt.query([]) else {
        return false;
    };
    while let Ok(Some(row)) = rows.next() {
        if let Ok(name) = row.get::<_, String>(1) {
            if name == column {
                return true;
            }
        }
    }
    false
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute_batch("PRAGMA journal_mode = WAL;").ok();

    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            scope TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            PRIMARY KEY (scope, key)
        )",
        (),
    )?;

    if !column_exists(conn, "kv_store", "updated_at") {
        conn.execute(
            "ALTER TABLE kv_store ADD COLUMN updated_at INTEGER NOT NULL DEFAULT 0",
            (),
        )
        .map_err(|e| DomainError::Storage(format!("Failed to add updated_at: {}", e)))?;
    }

    Ok(())
}
