pub mod folders;
pub mod migrations;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Value;
use rusqlite::{Connection, ToSql, TransactionBehavior};
use std::path::Path;
use std::sync::RwLock;
use std::time::Duration;

use crate::config::DatabaseConfig;

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error("Update of table {0} has no column values")]
    EmptyValues(String),

    #[error("Invalid database config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, DatabaseError>;

/// SQLite store guarded by a store-wide read/write lock.
///
/// Units of work run through [`LockableDatabase::execute`]. Non-exclusive work
/// shares the lock and runs in autocommit mode; exclusive work holds the lock
/// alone and runs inside an immediate transaction.
pub struct LockableDatabase {
    pool: DbPool,
    lock: RwLock<()>,
}

impl LockableDatabase {
    /// Open the database at `db_path` and run migrations
    pub fn open(db_path: &Path, config: &DatabaseConfig) -> Result<Self> {
        // r2d2 panics on a zero pool size or connection timeout
        if config.pool_size == 0 {
            return Err(DatabaseError::InvalidConfig(
                "pool_size must be at least 1".to_string(),
            ));
        }
        if config.connection_timeout_secs == 0 {
            return Err(DatabaseError::InvalidConfig(
                "connection_timeout_secs must be at least 1".to_string(),
            ));
        }

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let busy_timeout = Duration::from_secs(config.busy_timeout_secs);
        let manager = SqliteConnectionManager::file(db_path).with_init(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(Duration::from_secs(config.connection_timeout_secs))
            .build(manager)?;

        let database = LockableDatabase {
            pool,
            lock: RwLock::new(()),
        };

        database.execute(true, migrations::run_migrations)?;
        tracing::info!("Database opened at {}", db_path.display());

        Ok(database)
    }

    /// Run `work` against a pooled connection while holding the store lock.
    ///
    /// The lock and the connection are released when this returns, whether
    /// `work` succeeded or not. With `exclusive` set, a failing unit of work is
    /// rolled back.
    pub fn execute<T, F>(&self, exclusive: bool, work: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        if exclusive {
            let _guard = self.lock.write().map_err(|_| DatabaseError::LockPoisoned)?;
            let mut conn = self.pool.get()?;

            // Dropping an uncommitted transaction rolls it back
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let result = work(&tx)?;
            tx.commit()?;

            Ok(result)
        } else {
            let _guard = self.lock.read().map_err(|_| DatabaseError::LockPoisoned)?;
            let conn = self.pool.get()?;

            work(&conn)
        }
    }
}

/// Ordered column/value pairs for an `UPDATE` statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentValues {
    entries: Vec<(String, Value)>,
}

impl ContentValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `column` to `value`, replacing any earlier value for the same column
    pub fn put(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| name == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column.to_string(), value)),
        }
        self
    }

    pub fn put_null(&mut self, column: &str) -> &mut Self {
        self.put(column, Value::Null)
    }

    #[cfg(test)]
    fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Apply `values` to the rows of `table` matching `where_clause`.
///
/// Without a where clause every row of the table is updated. Placeholders in
/// `where_clause` are bound from `where_args` after the column values. Returns
/// the number of affected rows.
pub fn update(
    conn: &Connection,
    table: &str,
    values: &ContentValues,
    where_clause: Option<&str>,
    where_args: &[&dyn ToSql],
) -> Result<usize> {
    if values.is_empty() {
        return Err(DatabaseError::EmptyValues(table.to_string()));
    }

    let assignments = values
        .entries
        .iter()
        .map(|(column, _)| format!("\"{column}\" = ?"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut sql = format!("UPDATE \"{table}\" SET {assignments}");
    if let Some(clause) = where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(clause);
    }

    let mut params: Vec<&dyn ToSql> = values
        .entries
        .iter()
        .map(|(_, value)| value as &dyn ToSql)
        .collect();
    params.extend_from_slice(where_args);

    let rows = conn.execute(&sql, params.as_slice())?;

    Ok(rows)
}
