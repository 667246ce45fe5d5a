//! Table rendering for query results
//!
//! [`TabularRenderer`] turns rows into a [`RenderedTable`]: a header, one body
//! row per input row, and a trailing summary row stating how many rows were
//! rendered. Rendering does no I/O; [`RenderedTable::to_html`] produces the
//! HTML fragment.

use std::fmt::Write as _;

use crate::cursor::Row;
use crate::error::Result;

/// Inline action attached to a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    /// Form that posts a new role for the row's identifier
    EditRole {
        /// Column holding the identifier bound into the form
        id_column: String,
        /// Form `action` attribute
        form_action: String,
    },
}

/// One output column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub header: String,
    pub source: Option<String>,
    pub action: Option<RowAction>,
}

impl ColumnSpec {
    /// A column showing the value of `source`
    pub fn data(header: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            source: Some(source.into()),
            action: None,
        }
    }

    /// A column carrying an inline action
    pub fn action(header: impl Into<String>, action: RowAction) -> Self {
        Self {
            header: header.into(),
            source: None,
            action: Some(action),
        }
    }

    fn is_data(&self) -> bool {
        self.action.is_none()
    }
}

/// A rendered cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    EditRoleForm { itemid: String, form_action: String },
    Empty,
}

/// Trailing row of a rendered table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRow {
    /// Rows rendered
    pub total: usize,
    /// Data columns the summary cell spans
    pub span: usize,
    /// Empty cells after the summary cell, one per action column
    pub trailing: usize,
}

impl SummaryRow {
    pub fn text(&self) -> String {
        format!("Total: {} items", self.total)
    }
}

/// Structural table produced by [`TabularRenderer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub summary: SummaryRow,
}

impl RenderedTable {
    /// Number of body rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Render as an HTML `<table>` fragment
    pub fn to_html(&self) -> String {
        let mut out = String::from("<table><tr>");
        for header in &self.headers {
            let _ = write!(out, "<th>{}</th>", escape_html(header));
        }
        out.push_str("</tr>");

        for row in &self.rows {
            out.push_str("<tr>");
            for cell in row {
                out.push_str("<td>");
                write_cell(&mut out, cell);
                out.push_str("</td>");
            }
            out.push_str("</tr>");
        }

        out.push_str("<tr>");
        match self.summary.span {
            0 | 1 => {
                let _ = write!(out, "<th>{}</th>", self.summary.text());
            }
            span => {
                let _ = write!(out, "<th colspan=\"{}\">{}</th>", span, self.summary.text());
            }
        }
        for _ in 0..self.summary.trailing {
            out.push_str("<th></th>");
        }
        out.push_str("</tr></table>");
        out
    }
}

fn write_cell(out: &mut String, cell: &Cell) {
    match cell {
        Cell::Text(text) => out.push_str(&escape_html(text)),
        Cell::EditRoleForm {
            itemid,
            form_action,
        } => {
            let _ = write!(
                out,
                "<form action=\"{}\" method=\"post\">\
                 <input type=\"text\" name=\"newrole\">\
                 <input type=\"hidden\" name=\"itemid\" value=\"{}\">\
                 <input type=\"submit\" value=\"Change role\">\
                 </form>",
                escape_html(form_action),
                escape_html(itemid)
            );
        }
        Cell::Empty => {}
    }
}

/// Escape text for HTML element content and quoted attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders rows into a [`RenderedTable`] according to a fixed column layout
#[derive(Debug, Clone)]
pub struct TabularRenderer {
    columns: Vec<ColumnSpec>,
}

impl TabularRenderer {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Render fallible rows, typically a [`crate::ResultCursor`]
    ///
    /// The first failed row aborts rendering; no partial table is returned.
    pub fn render<I>(&self, rows: I) -> Result<RenderedTable>
    where
        I: IntoIterator<Item = Result<Row>>,
    {
        let mut body = Vec::new();
        let mut total = 0usize;
        for row in rows {
            body.push(self.render_row(&row?)?);
            total += 1;
        }

        let span = self.columns.iter().filter(|c| c.is_data()).count();
        Ok(RenderedTable {
            headers: self.columns.iter().map(|c| c.header.clone()).collect(),
            rows: body,
            summary: SummaryRow {
                total,
                span,
                trailing: self.columns.len() - span,
            },
        })
    }

    /// Render a literal row list
    pub fn render_rows<I>(&self, rows: I) -> Result<RenderedTable>
    where
        I: IntoIterator<Item = Row>,
    {
        self.render(rows.into_iter().map(Ok))
    }

    fn render_row(&self, row: &Row) -> Result<Vec<Cell>> {
        self.columns
            .iter()
            .map(|column| match (&column.action, &column.source) {
                (Some(RowAction::EditRole { id_column, form_action }), _) => {
                    Ok(Cell::EditRoleForm {
                        itemid: row.get(id_column)?.to_string(),
                        form_action: form_action.clone(),
                    })
                }
                (None, Some(source)) => Ok(Cell::Text(row.get(source)?.to_string())),
                (None, None) => Ok(Cell::Empty),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Value;
    use crate::error::LastmileError;

    fn item_columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::data("ID", "itemid"),
            ColumnSpec::data("Host", "host"),
            ColumnSpec::data("Role", "role"),
            ColumnSpec::action(
                "Edit",
                RowAction::EditRole {
                    id_column: "itemid".to_string(),
                    form_action: "?p=cfg".to_string(),
                },
            ),
        ]
    }

    fn item_row(id: i64, host: &str, role: &str) -> Row {
        Row::from_pairs([
            ("itemid", Value::Integer(id)),
            ("host", Value::from(host)),
            ("role", Value::from(role)),
        ])
    }

    #[test]
    fn test_empty_table() {
        let table = TabularRenderer::new(item_columns())
            .render_rows(Vec::new())
            .unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.summary.total, 0);
        assert_eq!(
            table.to_html(),
            "<table><tr><th>ID</th><th>Host</th><th>Role</th><th>Edit</th></tr>\
             <tr><th colspan=\"3\">Total: 0 items</th><th></th></tr></table>"
        );
    }

    #[test]
    fn test_rows_and_summary() {
        let table = TabularRenderer::new(item_columns())
            .render_rows(vec![item_row(1, "host-a", "core"), item_row(2, "host-b", "edge")])
            .unwrap();

        assert_eq!(table.headers, vec!["ID", "Host", "Role", "Edit"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.summary.text(), "Total: 2 items");
        assert_eq!(table.summary.span, 3);
        assert_eq!(table.summary.trailing, 1);
        assert_eq!(
            table.rows[1],
            vec![
                Cell::Text("2".into()),
                Cell::Text("host-b".into()),
                Cell::Text("edge".into()),
                Cell::EditRoleForm {
                    itemid: "2".into(),
                    form_action: "?p=cfg".into()
                },
            ]
        );
    }

    #[test]
    fn test_row_html() {
        let html = TabularRenderer::new(item_columns())
            .render_rows(vec![item_row(1, "host-a", "core")])
            .unwrap()
            .to_html();
        assert!(html.contains(
            "<tr><td>1</td><td>host-a</td><td>core</td><td>\
             <form action=\"?p=cfg\" method=\"post\">\
             <input type=\"text\" name=\"newrole\">\
             <input type=\"hidden\" name=\"itemid\" value=\"1\">\
             <input type=\"submit\" value=\"Change role\"></form></td></tr>"
        ));
        assert!(html.ends_with("<tr><th colspan=\"3\">Total: 1 items</th><th></th></tr></table>"));
    }

    #[test]
    fn test_cell_text_is_escaped() {
        let html = TabularRenderer::new(item_columns())
            .render_rows(vec![item_row(1, "<b>host</b>", "a&b")])
            .unwrap()
            .to_html();
        assert!(html.contains("<td>&lt;b&gt;host&lt;/b&gt;</td><td>a&amp;b</td>"));
    }

    #[test]
    fn test_missing_column_fails() {
        let row = Row::from_pairs([("itemid", Value::Integer(1))]);
        let result = TabularRenderer::new(item_columns()).render_rows(vec![row]);
        assert!(matches!(result, Err(LastmileError::ColumnNotFound(ref c)) if c == "host"));
    }

    #[test]
    fn test_failed_row_aborts() {
        let rows = vec![
            Ok(item_row(1, "host-a", "core")),
            Err(LastmileError::QueryExecution("disk I/O error".into())),
        ];
        let result = TabularRenderer::new(item_columns()).render(rows);
        assert!(matches!(result, Err(LastmileError::QueryExecution(_))));
    }

    #[test]
    fn test_count_is_taken_while_iterating() {
        // No size hint available up front
        let rows = (1..=5).filter(|i| i % 2 == 1).map(|i| Ok(item_row(i, "h", "r")));
        let table = TabularRenderer::new(item_columns()).render(rows).unwrap();
        assert_eq!(table.summary.total, 3);
    }

    #[test]
    fn test_single_data_column_has_no_colspan() {
        let table = TabularRenderer::new(vec![ColumnSpec::data("Host", "host")])
            .render_rows(vec![item_row(1, "host-a", "core")])
            .unwrap();
        assert!(table
            .to_html()
            .ends_with("<tr><th>Total: 1 items</th></tr></table>"));
    }
}
