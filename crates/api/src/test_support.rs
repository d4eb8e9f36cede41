//! Helpers shared by handler tests.

use axum::body::to_bytes;
use axum::response::{IntoResponse, Response};
use database::Database;
use serde_json::Value;

use crate::auth::AdminCredentials;
use crate::state::AppState;

/// State over a fresh in-memory database.
pub async fn test_state() -> AppState {
    let db = Database::connect_with_pool_size("sqlite::memory:", 1)
        .await
        .unwrap();
    db.migrate().await.unwrap();
    AppState::new(
        db,
        AdminCredentials::new("admin", "admin123", AdminCredentials::DEFAULT_SECRET),
    )
}

/// Render a handler result and decode its JSON body.
pub async fn json_body(response: impl IntoResponse) -> (u16, Value) {
    let response: Response = response.into_response();
    let status = response.status().as_u16();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
