//! SQLite schema for the items table

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Table name used when none is configured
pub const DEFAULT_ITEMS_TABLE: &str = "def";

/// A validated items table name
///
/// Table names cannot be bound as statement parameters, so they are restricted
/// to plain identifiers and always emitted quoted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemsTable(String);

impl ItemsTable {
    /// Validate a table name
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '_')
            .unwrap_or(false);
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ConfigError::InvalidTableName(name));
        }
        Ok(Self(name))
    }

    /// The bare table name
    pub fn name(&self) -> &str {
        &self.0
    }

    /// The table name as a quoted SQL identifier
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl Default for ItemsTable {
    fn default() -> Self {
        Self(DEFAULT_ITEMS_TABLE.to_string())
    }
}

impl fmt::Display for ItemsTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ItemsTable {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ItemsTable> for String {
    fn from(table: ItemsTable) -> Self {
        table.0
    }
}

/// SQLite schema definition
pub struct Schema;

impl Schema {
    /// DDL creating the items table if it does not exist yet
    pub fn items_table_sql(table: &ItemsTable) -> String {
        format!(
            r#"
CREATE TABLE IF NOT EXISTS {table} (
    itemid INTEGER PRIMARY KEY,
    host TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS {index} ON {table}(role);
"#,
            table = table.quoted(),
            index = format!("\"idx_{}_role\"", table.name()),
        )
    }

    /// Listing statement: every item ordered by role
    pub fn listing_sql(table: &ItemsTable) -> String {
        format!(
            "SELECT itemid, host, role FROM {} ORDER BY role",
            table.quoted()
        )
    }

    /// Role update statement, bound as `?1 = role`, `?2 = itemid`
    pub fn update_role_sql(table: &ItemsTable) -> String {
        format!("UPDATE {} SET role = ?1 WHERE itemid = ?2", table.quoted())
    }
}
