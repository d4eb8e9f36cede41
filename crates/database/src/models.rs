//! Database models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// A verified user, identified by their phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Display name.
    pub full_name: String,
    /// 11-digit phone number (e.g., "08012345678").
    pub phone_number: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last time the user passed verification.
    pub last_verified_at: Option<String>,
}

/// A user row with the number of saved calculations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    pub id: i64,
    pub full_name: String,
    pub phone_number: String,
    pub created_at: String,
    pub last_verified_at: Option<String>,
    /// Number of history entries stored under this user's phone.
    pub calculation_count: i64,
}

/// Changes an admin can make to a user.
///
/// `None` and blank values leave the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub new_phone: Option<String>,
}

/// Which calculator produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum FeatureType {
    BudgetToBid,
    BidToTotal,
    Profit,
}

impl FeatureType {
    /// All feature types, in display order.
    pub const ALL: [FeatureType; 3] = [
        FeatureType::BudgetToBid,
        FeatureType::BidToTotal,
        FeatureType::Profit,
    ];

    /// Get the stored tag for this feature.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureType::BudgetToBid => "budget_to_bid",
            FeatureType::BidToTotal => "bid_to_total",
            FeatureType::Profit => "profit",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown feature tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feature type: {0}")]
pub struct UnknownFeatureType(pub String);

impl FromStr for FeatureType {
    type Err = UnknownFeatureType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureType::ALL
            .into_iter()
            .find(|feature| feature.as_str() == s)
            .ok_or_else(|| UnknownFeatureType(s.to_string()))
    }
}

/// A saved calculation with its JSON blobs decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Phone number of the owning user.
    pub user_phone: String,
    pub feature_type: FeatureType,
    /// Calculator input as submitted by the client.
    pub input_data: Value,
    /// Calculator output as submitted by the client.
    pub output_data: Value,
    /// Creation timestamp.
    pub created_at: String,
}

/// Raw `calculation_history` row.
#[derive(Debug, FromRow)]
pub(crate) struct HistoryRow {
    pub id: i64,
    pub user_phone: String,
    pub feature_type: FeatureType,
    pub input_data: String,
    pub output_data: String,
    pub created_at: String,
}

impl From<HistoryRow> for HistoryEntry {
    fn from(row: HistoryRow) -> Self {
        Self {
            id: row.id,
            user_phone: row.user_phone,
            feature_type: row.feature_type,
            input_data: decode_blob(&row.input_data),
            output_data: decode_blob(&row.output_data),
            created_at: row.created_at,
        }
    }
}

/// Decode a stored blob; anything unreadable comes back as `{}`.
fn decode_blob(raw: &str) -> Value {
    match serde_json::from_str(raw) {
        Ok(Value::Null) | Err(_) => Value::Object(Default::default()),
        Ok(value) => value,
    }
}
