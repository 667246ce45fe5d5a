//! Forward-only cursor over query results
//!
//! A [`ResultCursor`] wraps the rows of one executed statement. Rows are
//! materialized one at a time into owned [`Row`] values; nothing is buffered
//! beyond a single lookahead row, and the cursor cannot be rewound.

use std::fmt;
use std::sync::Arc;

use rusqlite::types::{FromSql, ValueRef};

use crate::error::{LastmileError, Result};

/// A scalar column value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn as_value_ref(&self) -> ValueRef<'_> {
        match self {
            Value::Null => ValueRef::Null,
            Value::Integer(i) => ValueRef::Integer(*i),
            Value::Real(r) => ValueRef::Real(*r),
            Value::Text(s) => ValueRef::Text(s.as_bytes()),
            Value::Blob(b) => ValueRef::Blob(b),
        }
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(r) => Value::Real(r),
            // Text that is not valid UTF-8 is kept byte for byte
            ValueRef::Text(t) => match std::str::from_utf8(t) {
                Ok(s) => Value::Text(s.to_owned()),
                Err(_) => Value::Blob(t.to_vec()),
            },
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// Null renders as an empty string
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => write!(f, "{}", s),
            Value::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// One result row, addressed by column name
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Build a row from parallel column and value lists
    ///
    /// Surplus columns or values beyond the shorter list are dropped.
    pub fn new(mut columns: Vec<String>, mut values: Vec<Value>) -> Self {
        let len = columns.len().min(values.len());
        columns.truncate(len);
        values.truncate(len);
        Self {
            columns: columns.into(),
            values,
        }
    }

    /// Build a row from `(column, value)` pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let (columns, values): (Vec<String>, Vec<Value>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self::new(columns, values)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a value by column name
    pub fn get(&self, column: &str) -> Result<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.values[idx])
            .ok_or_else(|| LastmileError::ColumnNotFound(column.to_string()))
    }

    /// Get a value by column name, converted to `T`
    pub fn get_as<T: FromSql>(&self, column: &str) -> Result<T> {
        let value = self.get(column)?;
        T::column_result(value.as_value_ref()).map_err(|e| LastmileError::InvalidColumnType {
            column: column.to_string(),
            message: e.to_string(),
        })
    }

    /// Iterate `(column, value)` pairs in result order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

/// Forward-only, read-once cursor over the rows of one statement
///
/// `next_row` past the end fails with [`LastmileError::CursorExhausted`]; the
/// [`Iterator`] view yields `None` instead. A failed fetch ends the cursor.
pub struct ResultCursor<'stmt> {
    rows: rusqlite::Rows<'stmt>,
    columns: Arc<[String]>,
    peeked: Option<Row>,
    exhausted: bool,
    rows_read: usize,
}

impl<'stmt> ResultCursor<'stmt> {
    pub(crate) fn new(rows: rusqlite::Rows<'stmt>, columns: Arc<[String]>) -> Self {
        Self {
            rows,
            columns,
            peeked: None,
            exhausted: false,
            rows_read: 0,
        }
    }

    /// Column names of the result, in statement order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows handed out so far
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Whether another row is available, without consuming it
    pub fn has_next(&mut self) -> Result<bool> {
        if self.peeked.is_some() {
            return Ok(true);
        }
        match self.fetch()? {
            Some(row) => {
                self.peeked = Some(row);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Take the next row
    pub fn next_row(&mut self) -> Result<Row> {
        let row = match self.peeked.take() {
            Some(row) => row,
            None => self.fetch()?.ok_or(LastmileError::CursorExhausted)?,
        };
        self.rows_read += 1;
        Ok(row)
    }

    fn fetch(&mut self) -> Result<Option<Row>> {
        if self.exhausted {
            return Ok(None);
        }
        let width = self.columns.len();
        let fetched = match self.rows.next() {
            Ok(Some(row)) => (0..width)
                .map(|idx| row.get_ref(idx).map(Value::from))
                .collect::<rusqlite::Result<Vec<_>>>()
                .map(Some),
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };
        match fetched {
            Ok(Some(values)) => Ok(Some(Row {
                columns: Arc::clone(&self.columns),
                values,
            })),
            Ok(None) => {
                self.exhausted = true;
                Ok(None)
            }
            Err(e) => {
                self.exhausted = true;
                Err(e.into())
            }
        }
    }
}

impl Iterator for ResultCursor<'_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.has_next() {
            Ok(true) => Some(self.next_row()),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
