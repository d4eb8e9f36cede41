//! Calculation history persistence.

use serde_json::Value;
use sqlx::SqlitePool;

use crate::models::{FeatureType, HistoryEntry, HistoryRow};
use crate::Result;

/// Insert a calculation history entry and return its id.
pub async fn insert_entry(
    pool: &SqlitePool,
    user_phone: &str,
    feature_type: FeatureType,
    input_data: &Value,
    output_data: &Value,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO calculation_history (user_phone, feature_type, input_data, output_data)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(user_phone)
    .bind(feature_type)
    .bind(input_data.to_string())
    .bind(output_data.to_string())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// List all history entries for a phone number, newest first.
pub async fn list_entries(pool: &SqlitePool, user_phone: &str) -> Result<Vec<HistoryEntry>> {
    let rows = sqlx::query_as::<_, HistoryRow>(
        r#"
        SELECT id, user_phone, feature_type, input_data, output_data, created_at
        FROM calculation_history
        WHERE user_phone = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_phone)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(HistoryEntry::from).collect())
}

/// Delete one entry belonging to a phone number.
///
/// Returns the number of rows removed; an unknown id removes nothing.
pub async fn delete_entry(pool: &SqlitePool, user_phone: &str, id: i64) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM calculation_history
        WHERE user_phone = ? AND id = ?
        "#,
    )
    .bind(user_phone)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Delete every entry belonging to a phone number.
pub async fn delete_all_entries(pool: &SqlitePool, user_phone: &str) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM calculation_history
        WHERE user_phone = ?
        "#,
    )
    .bind(user_phone)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Delete an entry by id regardless of owner.
pub async fn delete_entry_by_id(pool: &SqlitePool, id: i64) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM calculation_history
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Replace the input and/or output blob of an entry.
///
/// Fields passed as `None` are left alone. Returns true if a row changed.
pub async fn update_entry(
    pool: &SqlitePool,
    id: i64,
    input_data: Option<&Value>,
    output_data: Option<&Value>,
) -> Result<bool> {
    // Column names are fixed strings; only values are bound.
    let mut assignments = Vec::with_capacity(2);
    if input_data.is_some() {
        assignments.push("input_data = ?");
    }
    if output_data.is_some() {
        assignments.push("output_data = ?");
    }

    if assignments.is_empty() {
        return Ok(false);
    }

    let sql = format!(
        "UPDATE calculation_history SET {} WHERE id = ?",
        assignments.join(", ")
    );

    let mut query = sqlx::query(&sql);
    if let Some(input_data) = input_data {
        query = query.bind(input_data.to_string());
    }
    if let Some(output_data) = output_data {
        query = query.bind(output_data.to_string());
    }

    let result = query.bind(id).execute(pool).await?;

    Ok(result.rows_affected() > 0)
}
