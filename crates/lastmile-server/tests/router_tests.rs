//! Router integration tests against a temporary database file

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use tempfile::TempDir;
use tower::ServiceExt;

use lastmile_core::{DashboardConfig, ReportConfig, Session};
use lastmile_server::{create_router, AppState};

struct Fixture {
    _dir: TempDir,
    state: Arc<AppState>,
}

fn fixture(reports: Vec<ReportConfig>) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let mut config = DashboardConfig::default();
    config.database.path = dir.path().join("lastmile.db");
    config.reports = reports;

    let state = Arc::new(AppState::new(config));
    state.initialize().unwrap();

    let session = state.open_session().unwrap();
    session
        .execute_batch(
            "INSERT INTO def (itemid, host, role) VALUES (1, 'host-a', 'core');
             INSERT INTO def (itemid, host, role) VALUES (2, 'host-b', 'edge');",
        )
        .unwrap();

    Fixture { _dir: dir, state }
}

async fn send(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, String) {
    let response = create_router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_main_page() {
    let fx = fixture(Vec::new());
    let (status, body) = send(&fx.state, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>Last Mile Optical Power Report</h1>"));
    assert!(body.contains("<a href=\"?p=rep\">Reports</a>"));
}

#[tokio::test]
async fn test_edit_items_page_lists_items() {
    let fx = fixture(Vec::new());
    let (status, body) = send(&fx.state, get("/?p=cfg")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<th>ID</th><th>Host</th><th>Role</th><th>Edit</th>"));
    assert!(body.contains("<th colspan=\"3\">Total: 2 items</th>"));

    let core = body.find("<td>core</td>").unwrap();
    let edge = body.find("<td>edge</td>").unwrap();
    assert!(core < edge);
}

#[tokio::test]
async fn test_post_edit_is_reflected() {
    let fx = fixture(Vec::new());
    let (status, body) = send(&fx.state, post_form("/?p=cfg", "newrole=core&itemid=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("<td>core</td>").count(), 2);
    assert!(!body.contains("<td>edge</td>"));
    assert!(body.contains("Total: 2 items"));

    // Persisted for the next request
    let (_, body) = send(&fx.state, get("/?p=cfg")).await;
    assert_eq!(body.matches("<td>core</td>").count(), 2);
}

#[tokio::test]
async fn test_post_without_newrole_only_lists() {
    let fx = fixture(Vec::new());
    let (_, before) = send(&fx.state, get("/?p=cfg")).await;
    let (status, after) = send(&fx.state, post_form("/?p=cfg", "newrole=&itemid=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_post_with_bad_itemid() {
    let fx = fixture(Vec::new());
    let (status, body) = send(&fx.state, post_form("/?p=cfg", "newrole=core&itemid=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid form input"));
    assert!(!body.contains("<table>"));
}

#[tokio::test]
async fn test_reports_page() {
    let fx = fixture(vec![ReportConfig {
        title: "Edge hosts".to_string(),
        sql: "SELECT host FROM def WHERE role = 'edge'".to_string(),
    }]);
    let (status, body) = send(&fx.state, get("/?p=rep")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h2>Edge hosts</h2>"));
    assert!(body.contains("{host: host-b}<br>"));
    assert!(!body.contains("host-a"));
}

#[tokio::test]
async fn test_failing_report_shows_raw_error() {
    let fx = fixture(vec![ReportConfig {
        title: "Broken".to_string(),
        sql: "SELECT * FROM readings".to_string(),
    }]);
    let (status, body) = send(&fx.state, get("/?p=rep")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("no such table: readings"));
}

#[tokio::test]
async fn test_unknown_page() {
    let fx = fixture(Vec::new());
    let (status, _) = send(&fx.state, get("/?p=upd")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_to_other_page_rejected() {
    let fx = fixture(Vec::new());
    let (status, _) = send(&fx.state, post_form("/?p=rep", "newrole=core&itemid=1")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let session = Session::open(&fx.state.config.database.path).unwrap();
    let roles = session
        .query_with("SELECT role FROM def WHERE itemid = 1", [], |cursor| {
            cursor.next_row()?.get_as::<String>("role")
        })
        .unwrap();
    assert_eq!(roles, "core");
}
