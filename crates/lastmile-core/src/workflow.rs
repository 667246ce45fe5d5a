//! List/edit-commit workflow for the items table
//!
//! ```text
//! Idle ─(edit pending)→ ApplyEdit ─→ List
//!   └──────(no edit)──────────────────↑
//! ```
//!
//! The edit is always committed before the listing query runs, on the same
//! session, so the rendered table reflects it.

use crate::config::DashboardConfig;
use crate::cursor::Row;
use crate::error::Result;
use crate::item::{EditCommand, Item};
use crate::render::{ColumnSpec, RenderedTable, RowAction, TabularRenderer};
use crate::schema::{ItemsTable, Schema};
use crate::session::Session;

/// Default form target for the edit action
pub const DEFAULT_FORM_ACTION: &str = "?p=cfg";

/// Applies an optional role edit, then lists every item as a table
#[derive(Debug, Clone)]
pub struct ListEditWorkflow {
    listing_sql: String,
    update_sql: String,
    renderer: TabularRenderer,
}

impl ListEditWorkflow {
    pub fn new(table: &ItemsTable, form_action: impl Into<String>) -> Self {
        let renderer = TabularRenderer::new(vec![
            ColumnSpec::data("ID", "itemid"),
            ColumnSpec::data("Host", "host"),
            ColumnSpec::data("Role", "role"),
            ColumnSpec::action(
                "Edit",
                RowAction::EditRole {
                    id_column: "itemid".to_string(),
                    form_action: form_action.into(),
                },
            ),
        ]);

        Self {
            listing_sql: Schema::listing_sql(table),
            update_sql: Schema::update_role_sql(table),
            renderer,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(&config.database.items_table, config.server.form_action.clone())
    }

    /// Run one pass: apply `edit` if present, then render the listing
    ///
    /// A failing edit aborts the pass before anything is listed.
    pub fn run(&self, session: &Session, edit: Option<&EditCommand>) -> Result<RenderedTable> {
        if let Some(edit) = edit {
            self.apply_edit(session, edit)?;
        }
        self.list(session)
    }

    /// Set the role of one item, returning the number of rows changed
    ///
    /// An unknown itemid changes nothing and is not an error.
    pub fn apply_edit(&self, session: &Session, edit: &EditCommand) -> Result<usize> {
        let changed = session.execute(
            &self.update_sql,
            rusqlite::params![edit.new_role, edit.itemid.0],
        )?;

        if changed == 0 {
            tracing::debug!(itemid = %edit.itemid, "Role edit matched no item");
        } else {
            tracing::info!(itemid = %edit.itemid, role = %edit.new_role, "Applied role edit");
        }
        Ok(changed)
    }

    /// Render every item, ordered by role
    pub fn list(&self, session: &Session) -> Result<RenderedTable> {
        let table = session.query_with(&self.listing_sql, [], |cursor| {
            self.renderer.render(cursor)
        })?;
        tracing::debug!(items = table.summary.total, "Rendered item listing");
        Ok(table)
    }

    /// Read every item, ordered by role, without rendering
    pub fn items(&self, session: &Session) -> Result<Vec<Item>> {
        session.query_with(&self.listing_sql, [], |cursor| {
            cursor
                .map(|row| row.and_then(|row: Row| Item::from_row(&row)))
                .collect()
        })
    }
}
