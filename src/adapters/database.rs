use crate::utils::error::{PackingError, Result};
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared SQLite connection holding the packaging catalog and packing results.
#[derive(Clone)]
pub struct SqliteDatabase {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDatabase {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    /// In-memory database (tests, or no `storage.database_path` configured).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| PackingError::data_source("SQLite connection lock poisoned"))
    }

    /// Runs blocking SQLite work on the blocking pool instead of a runtime worker.
    pub(crate) async fn call<F, T>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = db.lock()?;
            work(&mut conn)
        })
        .await
        .map_err(|e| PackingError::data_source(format!("database task failed: {}", e)))?
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS packagings (
                id INTEGER PRIMARY KEY,
                width REAL NOT NULL,
                height REAL NOT NULL,
                length REAL NOT NULL,
                max_weight REAL NOT NULL
            )",
            [],
        )?;

        // Box geometry is copied next to the reference so a record stays
        // readable when the catalog comes from elsewhere.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS packing_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                fingerprint TEXT NOT NULL UNIQUE,
                packaging_id INTEGER NOT NULL,
                width REAL NOT NULL,
                height REAL NOT NULL,
                length REAL NOT NULL,
                max_weight REAL NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }
}

pub(crate) fn to_sql_id(id: u64) -> Result<i64> {
    i64::try_from(id)
        .map_err(|_| PackingError::data_source(format!("packaging id {} out of range", id)))
}

/// Reads a packaging id column, rejecting negative values instead of wrapping them.
pub(crate) fn packaging_id_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let raw: i64 = row.get(idx)?;
    u64::try_from(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}
