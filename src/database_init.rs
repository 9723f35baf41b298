use crate::error::ErrorContext;
use crate::error::Result;
use log::debug;
use log::info;
use log::warn;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

/// The one database handle of the process, created at startup and shared by all routes.
/// SQLite connections are not `Sync`, so requests take turns on the mutex.
pub type SharedConnection = Arc<Mutex<Connection>>;

const CREATE_ITEMS_TABLE: &str = "CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );";

/// Open (or create) the database file and make sure the `items` table exists.
pub fn open_database(path: &Path) -> Result<SharedConnection> {
    info!("Opening database {}", path.display());
    let conn = Connection::open(path)
        .context(|| format!("Failed to open database file {}", path.display()))?;
    init_schema(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// Private in-memory database, used by tests and benchmarks.
pub fn open_in_memory_database() -> Result<SharedConnection> {
    let conn = Connection::open_in_memory().context_str("Failed to open in-memory database")?;
    init_schema(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// Close the database once the server has stopped.
/// If a request still holds the handle, closing is left to the last owner.
pub fn close_database(conn: SharedConnection) -> Result<()> {
    let conn = match Arc::try_unwrap(conn) {
        Ok(conn) => conn.into_inner()?,
        Err(_still_shared) => {
            warn!("Database handle is still in use, it will be closed by its last user");
            return Ok(());
        }
    };
    conn.close()
        .map_err(|(_conn, err)| err)
        .context_str("Failed to close database")?;
    info!("Database closed");
    Ok(())
}

/// Idempotent schema creation, safe to run on every start.
pub fn init_schema(conn: &Connection) -> Result<()> {
    debug!("Ensuring table items exists");
    conn.execute_batch(CREATE_ITEMS_TABLE)
        .context_str("Failed to create table items")
}
