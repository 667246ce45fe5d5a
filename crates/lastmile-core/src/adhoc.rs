//! Ad-hoc report queries
//!
//! Runs one operator-supplied read statement and dumps every row as key/value
//! pairs. No table, no summary.

use std::fmt::Write as _;

use crate::cursor::Row;
use crate::error::{LastmileError, Result};
use crate::render::escape_html;
use crate::session::Session;

/// Runs a single read statement and emits one dump per row
pub struct AdHocQueryRunner;

impl AdHocQueryRunner {
    /// Execute `sql` and call `sink` once per row, in cursor order
    ///
    /// Returns the number of rows visited. Writing statements and SQL holding
    /// more than one statement are rejected before any row is read.
    pub fn run<F>(session: &Session, sql: &str, mut sink: F) -> Result<usize>
    where
        F: FnMut(&Row) -> Result<()>,
    {
        if sql.trim().is_empty() {
            return Err(LastmileError::QueryExecution("empty query".to_string()));
        }

        let visited = session.read_only_query_with(sql, [], |cursor| {
            while cursor.has_next()? {
                sink(&cursor.next_row()?)?;
            }
            Ok(cursor.rows_read())
        })?;
        tracing::debug!(rows = visited, "Ad-hoc query finished");
        Ok(visited)
    }

    /// Execute `sql` and return the HTML dump of every row
    pub fn dump(session: &Session, sql: &str) -> Result<String> {
        let mut out = String::new();
        Self::run(session, sql, |row| {
            out.push_str(&dump_row(row));
            out.push_str("<br>");
            Ok(())
        })?;
        Ok(out)
    }
}

/// Key/value dump of one row, e.g. `{itemid: 1, host: host-a}`
pub fn dump_row(row: &Row) -> String {
    let mut out = String::from("{");
    for (idx, (column, value)) in row.iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{}: {}", escape_html(column), escape_html(&value.to_string()));
    }
    out.push('}');
    out
}
