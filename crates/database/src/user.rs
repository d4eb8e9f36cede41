//! User operations.
//!
//! Users are keyed by phone number everywhere outside this table: history
//! rows carry a copy of the phone, not the numeric id. [`update_user`] and
//! [`delete_user`] therefore touch both tables inside one transaction.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{User, UserSummary, UserUpdate};

/// Create a user, or refresh the name and verification time of an existing one.
///
/// Concurrent verifications of the same phone resolve as last write wins.
pub async fn verify_user(pool: &SqlitePool, full_name: &str, phone_number: &str) -> Result<User> {
    sqlx::query(
        r#"
        INSERT INTO users (full_name, phone_number, last_verified_at)
        VALUES (?, ?, datetime('now'))
        ON CONFLICT(phone_number) DO UPDATE SET
            full_name = excluded.full_name,
            last_verified_at = excluded.last_verified_at
        "#,
    )
    .bind(full_name)
    .bind(phone_number)
    .execute(pool)
    .await?;

    get_user_by_phone(pool, phone_number).await
}

/// Get a user by phone number.
pub async fn get_user_by_phone(pool: &SqlitePool, phone_number: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, full_name, phone_number, created_at, last_verified_at
        FROM users
        WHERE phone_number = ?
        "#,
    )
    .bind(phone_number)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: phone_number.to_string(),
    })
}

/// List all users with their calculation counts, newest first.
pub async fn list_users_with_counts(pool: &SqlitePool) -> Result<Vec<UserSummary>> {
    let users = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT u.id, u.full_name, u.phone_number, u.created_at, u.last_verified_at,
               COUNT(ch.id) AS calculation_count
        FROM users u
        LEFT JOIN calculation_history ch ON ch.user_phone = u.phone_number
        GROUP BY u.id
        ORDER BY u.created_at DESC, u.id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Count total users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Rename a user and/or move them to a new phone number.
///
/// A phone change is carried over to every history row stored under the old
/// number. All statements run in one transaction: on any error nothing is
/// changed.
pub async fn update_user(pool: &SqlitePool, phone_number: &str, update: &UserUpdate) -> Result<()> {
    let full_name = update
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());
    let new_phone = update
        .new_phone
        .as_deref()
        .map(str::trim)
        .filter(|phone| !phone.is_empty() && *phone != phone_number);

    let mut tx = pool.begin().await?;

    let existing = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id FROM users WHERE phone_number = ?
        "#,
    )
    .bind(phone_number)
    .fetch_optional(&mut *tx)
    .await?;

    if existing.is_none() {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: phone_number.to_string(),
        });
    }

    if let Some(full_name) = full_name {
        sqlx::query(
            r#"
            UPDATE users
            SET full_name = ?
            WHERE phone_number = ?
            "#,
        )
        .bind(full_name)
        .bind(phone_number)
        .execute(&mut *tx)
        .await?;
    }

    if let Some(new_phone) = new_phone {
        let taken = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users WHERE phone_number = ?
            "#,
        )
        .bind(new_phone)
        .fetch_one(&mut *tx)
        .await?;

        if taken > 0 {
            return Err(DatabaseError::AlreadyExists {
                entity: "User",
                id: new_phone.to_string(),
            });
        }

        sqlx::query(
            r#"
            UPDATE users
            SET phone_number = ?
            WHERE phone_number = ?
            "#,
        )
        .bind(new_phone)
        .bind(phone_number)
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::from_unique(e, "User", new_phone))?;

        let moved = sqlx::query(
            r#"
            UPDATE calculation_history
            SET user_phone = ?
            WHERE user_phone = ?
            "#,
        )
        .bind(new_phone)
        .bind(phone_number)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tracing::info!(
            from = phone_number,
            to = new_phone,
            history_rows = moved,
            "Moved user to new phone number"
        );
    }

    tx.commit().await?;

    Ok(())
}

/// Delete a user together with their calculation history.
///
/// Both deletes run in one transaction. Returns true if a user row was removed.
pub async fn delete_user(pool: &SqlitePool, phone_number: &str) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let history_rows = sqlx::query(
        r#"
        DELETE FROM calculation_history
        WHERE user_phone = ?
        "#,
    )
    .bind(phone_number)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let user_rows = sqlx::query(
        r#"
        DELETE FROM users
        WHERE phone_number = ?
        "#,
    )
    .bind(phone_number)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;

    tracing::info!(
        phone = phone_number,
        history_rows,
        "Deleted user and history"
    );

    Ok(user_rows > 0)
}
