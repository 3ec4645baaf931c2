//! Database Connection and Setup
//!
//! Manages SQLite database connection and migrations.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle to the single SQLite connection
pub type SharedConnection = Arc<Mutex<Option<Connection>>>;

/// Database state wrapper
#[derive(Clone, Default)]
pub struct DbState {
    pub conn: SharedConnection,
}

impl DbState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for repositories; they all lock the same connection
    pub fn shared(&self) -> SharedConnection {
        self.conn.clone()
    }

    pub async fn is_ready(&self) -> bool {
        self.conn.lock().await.is_some()
    }
}

/// Initialize database with path (`:memory:` for an in-memory database)
pub async fn init_db(db_path: &Path) -> Result<DbState, String> {
    let conn = if db_path == Path::new(":memory:") {
        Connection::open_in_memory()
    } else {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create db dir: {}", e))?;
            }
        }
        Connection::open(db_path)
    }
    .map_err(|e| format!("Failed to open db: {}", e))?;

    run_migrations(&conn)?;
    log::info!("database ready at {}", db_path.display());

    let state = DbState::new();
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
fn run_migrations(conn: &Connection) -> Result<(), String> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|e| e.to_string())?;

    // display_order is kept dense by renumbering, not by a UNIQUE constraint,
    // so a full renumber can pass through intermediate ties.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS stages (
            key TEXT PRIMARY KEY,
            label TEXT NOT NULL,
            color TEXT,
            display_order INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            is_system INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER,
            updated_at INTEGER
        );
        CREATE TABLE IF NOT EXISTS deals (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            value_cents INTEGER NOT NULL DEFAULT 0,
            contact TEXT,
            stage TEXT NOT NULL REFERENCES stages(key),
            created_at INTEGER,
            updated_at INTEGER
        );",
    )
    .map_err(|e| e.to_string())?;

    // Added after the first schema
    if !column_exists(conn, "deals", "notes") {
        conn.execute("ALTER TABLE deals ADD COLUMN notes TEXT", [])
            .map_err(|e| format!("Failed to add notes: {}", e))?;
    }

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_deals_stage ON deals(stage)",
        [],
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}
