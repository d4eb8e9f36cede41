//! Calculation history for verified users.
//!
//! These endpoints are gated by phone number only: whoever knows the phone
//! can read and delete its history.

use axum::extract::State;
use axum::Json;
use calculator::lenient;
use database::validation::validate_phone_number;
use database::{FeatureType, HistoryEntry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

const INVALID_PHONE: &str = "Valid user_phone (11 digits) required";

/// A history entry as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryItem {
    pub id: i64,
    pub feature_type: FeatureType,
    pub input_data: Value,
    pub output_data: Value,
    pub created_at: String,
}

impl From<HistoryEntry> for HistoryItem {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            id: entry.id,
            feature_type: entry.feature_type,
            input_data: entry.input_data,
            output_data: entry.output_data,
            created_at: entry.created_at,
        }
    }
}

/// Query for listing history.
#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub user_phone: String,
}

/// History list response.
#[derive(Serialize)]
pub struct ListResponse {
    pub history: Vec<HistoryItem>,
}

/// Request to save a calculation.
#[derive(Deserialize)]
pub struct SaveRequest {
    #[serde(default, deserialize_with = "lenient::text")]
    pub user_phone: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub feature_type: String,
    #[serde(default)]
    pub input_data: Option<Value>,
    #[serde(default)]
    pub output_data: Option<Value>,
}

/// Save result.
#[derive(Serialize)]
pub struct SaveResponse {
    pub id: i64,
    pub saved: bool,
}

/// Request to delete one or all entries.
#[derive(Deserialize)]
pub struct DeleteRequest {
    #[serde(default, deserialize_with = "lenient::text")]
    pub user_phone: String,
    /// Entry to delete; zero or absent deletes everything for the phone.
    #[serde(default, deserialize_with = "lenient::integer")]
    pub id: i64,
}

/// Delete result.
#[derive(Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// List a user's history, newest first.
pub async fn list_history(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<ListResponse>> {
    let user_phone = query.user_phone.trim();
    validate_phone_number(user_phone).map_err(|_| ApiError::BadRequest(INVALID_PHONE.into()))?;

    let entries = database::history::list_entries(state.db.pool(), user_phone)
        .await
        .map_err(ApiError::storage("Failed to load history"))?;

    Ok(Json(ListResponse {
        history: entries.into_iter().map(HistoryItem::from).collect(),
    }))
}

/// Save one calculation.
pub async fn save_history(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SaveRequest>,
) -> Result<Json<SaveResponse>> {
    let user_phone = req.user_phone.trim();
    let feature_type = req
        .feature_type
        .trim()
        .parse::<FeatureType>()
        .ok()
        .filter(|_| validate_phone_number(user_phone).is_ok())
        .ok_or_else(|| {
            ApiError::BadRequest("Missing or invalid user_phone / feature_type".into())
        })?;

    let input_data = blob_or_empty(req.input_data);
    let output_data = blob_or_empty(req.output_data);

    let id = database::history::insert_entry(
        state.db.pool(),
        user_phone,
        feature_type,
        &input_data,
        &output_data,
    )
    .await
    .map_err(ApiError::storage("Failed to save history"))?;

    info!(id, feature = %feature_type, "Saved calculation");

    Ok(Json(SaveResponse { id, saved: true }))
}

/// Delete one entry, or every entry for the phone when no id is given.
pub async fn delete_history(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<DeleteRequest>,
) -> Result<Json<DeleteResponse>> {
    let user_phone = req.user_phone.trim();
    validate_phone_number(user_phone).map_err(|_| ApiError::BadRequest(INVALID_PHONE.into()))?;

    let pool = state.db.pool();
    let removed = if req.id > 0 {
        database::history::delete_entry(pool, user_phone, req.id).await
    } else {
        database::history::delete_all_entries(pool, user_phone).await
    }
    .map_err(ApiError::storage("Failed to delete"))?;

    info!(removed, "Deleted history");

    Ok(Json(DeleteResponse { deleted: true }))
}

/// Keep objects and arrays; anything else is stored as `{}`.
pub(crate) fn blob_or_empty(value: Option<Value>) -> Value {
    match value {
        Some(value @ (Value::Object(_) | Value::Array(_))) => value,
        _ => Value::Object(Default::default()),
    }
}
