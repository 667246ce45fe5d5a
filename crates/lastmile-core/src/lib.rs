//! Lastmile Core - list/edit workflow for the last mile optical power dashboard
//!
//! This crate provides the parts of the dashboard with a real contract:
//!
//! - **Session**: an injected SQLite connection; every value is bound as a parameter
//! - **Cursor**: forward-only, read-once iteration over query rows
//! - **Render**: tables with a trailing `Total: N items` row, rendered to HTML
//! - **Workflow**: apply an optional role edit, then re-list every item
//! - **Adhoc**: run one read statement and dump each row
//! - **Config**: database, server, and report settings
//!
//! # Request flow
//!
//! ```text
//! form fields → EditForm → Option<EditCommand>
//!                              ↓
//! Session ──→ ListEditWorkflow::run ──→ UPDATE (optional) ──→ SELECT ──→ RenderedTable
//! ```
//!
//! Any statement failure ends the request with [`LastmileError::QueryExecution`];
//! nothing is retried and no partial table is produced.

pub mod adhoc;
pub mod config;
pub mod cursor;
pub mod error;
pub mod item;
pub mod render;
pub mod schema;
pub mod session;
pub mod workflow;

pub use adhoc::AdHocQueryRunner;
pub use config::{ConfigError, DashboardConfig, DatabaseConfig, ReportConfig, ServerConfig};
pub use cursor::{ResultCursor, Row, Value};
pub use error::{LastmileError, Result};
pub use item::{EditCommand, EditForm, Item, ItemId};
pub use render::{Cell, ColumnSpec, RenderedTable, RowAction, SummaryRow, TabularRenderer};
pub use schema::{ItemsTable, Schema};
pub use session::Session;
pub use workflow::ListEditWorkflow;
