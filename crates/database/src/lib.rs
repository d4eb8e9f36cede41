//! SQLite persistence layer for BizTools.
//!
//! This crate provides async database operations for verified users and
//! their saved calculations using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{history, user, Database, FeatureType};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:biztools.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Verify a user and save a calculation under their phone
//!     let user = user::verify_user(db.pool(), "Ada Obi", "08012345678").await?;
//!     history::insert_entry(
//!         db.pool(),
//!         &user.phone_number,
//!         FeatureType::Profit,
//!         &json!({"purchase_price": 10000}),
//!         &json!({"total_cost": 10000}),
//!     )
//!     .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod history;
pub mod models;
pub mod user;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::{FeatureType, HistoryEntry, User, UserSummary, UserUpdate};
pub use validation::ValidationError;

pub use sqlx;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

/// Pooled handle shared by every request.
///
/// Cloning is cheap; all clones use the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    const POOL_SIZE: u32 = 10;
    const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

    /// Open the BizTools database, creating the file if needed.
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// let db = database::Database::connect("sqlite:biztools.db?mode=rwc").await?;
    /// db.migrate().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::POOL_SIZE).await
    }

    /// Open a database with at most `pool_size` connections.
    ///
    /// Tests pass `sqlite::memory:` with a size of 1: each connection to an
    /// in-memory URL would otherwise see its own empty database, and a
    /// dropped transaction is rolled back before the next query runs.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        // No foreign keys: history rows follow users by phone, kept in step by user::update_user.
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Self::ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await?;

        tracing::info!(url, pool_size, "Opened BizTools database");

        Ok(Self { pool })
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Schema up to date");
        Ok(())
    }

    /// Run `SELECT 1`, used by the `check-db` endpoint.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// The underlying pool, passed to the `user` and `history` functions.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all connections; called once on shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
