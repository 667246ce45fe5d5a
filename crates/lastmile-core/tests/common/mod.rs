//! Shared fixtures for integration tests

use lastmile_core::{ItemsTable, Session};

/// Items used by most scenarios: `(itemid, host, role)`
pub const TWO_ITEMS: &[(i64, &str, &str)] = &[(1, "host-a", "core"), (2, "host-b", "edge")];

/// In-memory session with the default items table holding `items`
pub fn seeded_session(items: &[(i64, &str, &str)]) -> Session {
    let session = Session::in_memory().expect("in-memory session");
    seed(&session, items);
    session
}

/// Create the default items table on `session` and insert `items`
pub fn seed(session: &Session, items: &[(i64, &str, &str)]) {
    session
        .ensure_items_table(&ItemsTable::default())
        .expect("items table");
    for (id, host, role) in items {
        session
            .execute(
                "INSERT INTO def (itemid, host, role) VALUES (?1, ?2, ?3)",
                rusqlite::params![id, host, role],
            )
            .unwrap_or_else(|e| panic!("Failed to insert item {}: {}", id, e));
    }
}
