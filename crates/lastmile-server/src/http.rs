//! HTTP endpoint handlers
//!
//! Every request opens its own [`Session`] on a blocking thread, runs one core
//! workflow to completion, and drops the session before responding.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use lastmile_core::render::escape_html;
use lastmile_core::{
    AdHocQueryRunner, EditCommand, EditForm, LastmileError, ListEditWorkflow, Session,
};

use crate::page::{layout, Page};
use crate::AppState;

/// Query string of every page
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub p: Option<String>,
}

/// Errors surfaced to the operator in place of the page body
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Unknown page: {0}")]
    UnknownPage(String),

    #[error("Page {0} does not accept form posts")]
    MethodNotAllowed(&'static str),

    #[error(transparent)]
    Core(#[from] LastmileError),

    #[error("Request task failed: {0}")]
    Task(String),
}

impl PageError {
    pub fn status(&self) -> StatusCode {
        match self {
            PageError::UnknownPage(_) => StatusCode::NOT_FOUND,
            PageError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            PageError::Core(LastmileError::InvalidForm(_)) => StatusCode::BAD_REQUEST,
            PageError::Core(_) | PageError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }
        let body = format!("<p class=\"error\">{}</p>", escape_html(&self.to_string()));
        (status, Html(layout(&body))).into_response()
    }
}

fn resolve_page(query: &PageQuery) -> Result<Page, PageError> {
    Page::from_param(query.p.as_deref())
        .ok_or_else(|| PageError::UnknownPage(query.p.clone().unwrap_or_default()))
}

/// Render a page
pub async fn show_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, PageError> {
    let page = resolve_page(&query)?;
    render_page(state, page, None).await
}

/// Accept the edit form, then render the item listing
pub async fn submit_edit(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
    Form(form): Form<EditForm>,
) -> Result<Html<String>, PageError> {
    let page = resolve_page(&query)?;
    if page != Page::EditItems {
        return Err(PageError::MethodNotAllowed(page.label()));
    }
    let edit = form.into_command()?;
    render_page(state, page, edit).await
}

async fn render_page(
    state: Arc<AppState>,
    page: Page,
    edit: Option<EditCommand>,
) -> Result<Html<String>, PageError> {
    let body = match page {
        Page::Main => "<p>Select a view above.</p>".to_string(),
        Page::Reports => with_session(state, reports_body).await?,
        Page::EditItems => {
            with_session(state, move |state, session| {
                ListEditWorkflow::from_config(&state.config)
                    .run(session, edit.as_ref())
                    .map(|table| table.to_html())
            })
            .await?
        }
    };
    Ok(Html(layout(&body)))
}

fn reports_body(state: &AppState, session: &Session) -> lastmile_core::Result<String> {
    let mut body = String::new();
    for report in state.config.effective_reports() {
        body.push_str(&format!("<h2>{}</h2>\n", escape_html(&report.title)));
        body.push_str(&AdHocQueryRunner::dump(session, &report.sql)?);
        body.push('\n');
    }
    Ok(body)
}

/// Open a session for this request and run `f` on a blocking thread
async fn with_session<F, T>(state: Arc<AppState>, f: F) -> Result<T, PageError>
where
    F: FnOnce(&AppState, &Session) -> lastmile_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let session = state.open_session()?;
        f(&*state, &session)
    })
    .await
    .map_err(|e| PageError::Task(e.to_string()))?
    .map_err(PageError::from)
}
