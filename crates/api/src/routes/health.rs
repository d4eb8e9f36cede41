//! Health and database check endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: String,
}

/// Health check endpoint.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}

/// Database connectivity report.
#[derive(Serialize)]
pub struct DbCheck {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

/// Report whether the database answers queries.
pub async fn check_db(State(state): State<AppState>) -> Response {
    match state.db.ping().await {
        Ok(()) => Json(DbCheck {
            ok: true,
            message: Some("Database connection OK. History save will work."),
            error: None,
        })
        .into_response(),
        Err(err) => {
            tracing::error!("Database check failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DbCheck {
                    ok: false,
                    message: None,
                    error: Some("Database connection failed"),
                }),
            )
                .into_response()
        }
    }
}
