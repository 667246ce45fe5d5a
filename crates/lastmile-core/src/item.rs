//! Items, their identifiers, and pending role edits

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cursor::Row;
use crate::error::{LastmileError, Result};

/// Identifier of an item row
///
/// Read from the items table and only ever used as an update key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = LastmileError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<i64>()
            .map(ItemId)
            .map_err(|_| LastmileError::InvalidForm(format!("invalid itemid: {:?}", s)))
    }
}

/// A monitored device with its assigned role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub itemid: ItemId,
    pub host: String,
    pub role: String,
}

impl Item {
    /// Read an item from a listing row
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            itemid: ItemId(row.get_as("itemid")?),
            host: row.get_as::<Option<String>>("host")?.unwrap_or_default(),
            role: row.get_as::<Option<String>>("role")?.unwrap_or_default(),
        })
    }
}

/// A pending role change for one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditCommand {
    pub itemid: ItemId,
    pub new_role: String,
}

impl EditCommand {
    pub fn new(itemid: ItemId, new_role: impl Into<String>) -> Self {
        Self {
            itemid,
            new_role: new_role.into(),
        }
    }
}

/// Raw fields of the edit form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditForm {
    pub newrole: Option<String>,
    pub itemid: Option<String>,
}

impl EditForm {
    /// Turn the submitted fields into an edit, if one was requested
    ///
    /// A non-empty `newrole` requests an edit; the role text itself is taken
    /// as submitted.
    pub fn into_command(self) -> Result<Option<EditCommand>> {
        let new_role = match self.newrole {
            Some(role) if !role.is_empty() => role,
            _ => return Ok(None),
        };
        let itemid = self
            .itemid
            .ok_or_else(|| LastmileError::InvalidForm("missing itemid".to_string()))?
            .parse::<ItemId>()?;
        Ok(Some(EditCommand { itemid, new_role }))
    }
}
