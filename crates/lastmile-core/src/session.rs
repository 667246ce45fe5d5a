//! Database session passed into every workflow call

use std::path::Path;
use std::sync::Arc;

use rusqlite::Params;

use crate::cursor::ResultCursor;
use crate::error::{LastmileError, Result};
use crate::schema::{ItemsTable, Schema};

/// A single SQLite connection
///
/// The caller owns the session's lifetime; workflows only borrow it. Statements
/// are executed strictly one after another: a cursor borrows the session's
/// statement for as long as it lives, so a second statement can only be issued
/// once the first cursor has been released.
pub struct Session {
    conn: rusqlite::Connection,
}

impl Session {
    /// Open a session on the database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = rusqlite::Connection::open(path.as_ref())?;
        tracing::debug!("Opened session on {:?}", path.as_ref());
        Ok(Self { conn })
    }

    /// Open a session on a private in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = rusqlite::Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Create the items table and its index if missing
    pub fn ensure_items_table(&self, table: &ItemsTable) -> Result<()> {
        self.conn.execute_batch(&Schema::items_table_sql(table))?;
        Ok(())
    }

    /// Execute one statement with bound parameters, returning the affected row count
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        tracing::debug!(sql, "Executing statement");
        Ok(self.conn.execute(sql, params)?)
    }

    /// Execute a batch of parameterless statements
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Run a query and hand its cursor to `f`
    ///
    /// The prepared statement and its cursor are released when this returns,
    /// whether `f` succeeds, fails, or leaves rows unread.
    pub fn query_with<P, T, F>(&self, sql: &str, params: P, f: F) -> Result<T>
    where
        P: Params,
        F: FnOnce(&mut ResultCursor<'_>) -> Result<T>,
    {
        self.run_query(sql, params, false, f)
    }

    /// Like [`Session::query_with`], but rejects statements that would write
    ///
    /// `sql` must hold exactly one statement; trailing statements are an error
    /// rather than being silently skipped. Trailing comments are allowed.
    pub fn read_only_query_with<P, T, F>(&self, sql: &str, params: P, f: F) -> Result<T>
    where
        P: Params,
        F: FnOnce(&mut ResultCursor<'_>) -> Result<T>,
    {
        self.run_query(sql, params, true, f)
    }

    fn run_query<P, T, F>(&self, sql: &str, params: P, read_only: bool, f: F) -> Result<T>
    where
        P: Params,
        F: FnOnce(&mut ResultCursor<'_>) -> Result<T>,
    {
        tracing::debug!(sql, "Running query");
        if read_only {
            let count = self.statement_count(sql)?;
            if count != 1 {
                return Err(LastmileError::QueryExecution(format!(
                    "expected exactly one statement, found {}: {}",
                    count, sql
                )));
            }
        }
        let mut stmt = self.conn.prepare(sql)?;
        if read_only && !stmt.readonly() {
            return Err(LastmileError::QueryExecution(format!(
                "not a read statement: {}",
                sql
            )));
        }

        let columns: Arc<[String]> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let mut cursor = ResultCursor::new(stmt.query(params)?, columns);
        let result = f(&mut cursor);
        tracing::debug!(rows_read = cursor.rows_read(), "Released cursor");
        result
    }

    /// Count the non-empty statements in `sql`, stopping after the second
    ///
    /// `prepare` compiles only the first statement and ignores the rest, so the
    /// whole text is walked as a batch.
    fn statement_count(&self, sql: &str) -> Result<usize> {
        let mut batch = rusqlite::Batch::new(&self.conn, sql);
        let mut count = 0;
        while batch.next()?.is_some() {
            count += 1;
            if count > 1 {
                break;
            }
        }
        Ok(count)
    }
}
