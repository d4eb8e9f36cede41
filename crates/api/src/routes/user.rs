//! User verification.

use axum::extract::State;
use axum::Json;
use calculator::lenient;
use database::validation::{validate_full_name, validate_phone_number};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Request to verify a user.
#[derive(Deserialize)]
pub struct VerifyRequest {
    #[serde(default, deserialize_with = "lenient::text")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone_number: String,
}

/// Verification result.
#[derive(Serialize)]
pub struct VerifyResponse {
    pub status: &'static str,
    pub phone_number: String,
}

/// Create or refresh a user by phone number.
pub async fn verify_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<VerifyRequest>,
) -> Result<Json<VerifyResponse>> {
    let full_name = req.full_name.trim();
    let phone_number = req.phone_number.trim();

    validate_full_name(full_name)?;
    validate_phone_number(phone_number)?;

    let user = database::user::verify_user(state.db.pool(), full_name, phone_number).await?;

    info!(user_id = user.id, "User verified");

    Ok(Json(VerifyResponse {
        status: "verified",
        phone_number: user.phone_number,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{json_body, test_state};
    use serde_json::json;

    fn request(full_name: &str, phone_number: &str) -> ApiJson<VerifyRequest> {
        ApiJson(VerifyRequest {
            full_name: full_name.to_string(),
            phone_number: phone_number.to_string(),
        })
    }

    #[tokio::test]
    async fn test_verify_eleven_digits() {
        let state = test_state().await;

        let (status, body) =
            json_body(verify_user(State(state.clone()), request("Ada", " 08012345678 ")).await)
                .await;

        assert_eq!(status, 200);
        assert_eq!(body, json!({"status": "verified", "phone_number": "08012345678"}));

        let user = database::user::get_user_by_phone(state.db.pool(), "08012345678")
            .await
            .unwrap();
        assert_eq!(user.full_name, "Ada");
    }

    #[tokio::test]
    async fn test_verify_ten_digits_rejected() {
        let state = test_state().await;

        let (status, body) =
            json_body(verify_user(State(state.clone()), request("Ada", "0801234567")).await).await;

        assert_eq!(status, 400);
        assert_eq!(
            body["error"],
            "Invalid phone number. Use 11 digits (e.g. 08012345678)."
        );
        assert_eq!(database::user::count_users(state.db.pool()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_verify_requires_name() {
        let state = test_state().await;

        let (status, body) =
            json_body(verify_user(State(state), request("   ", "08012345678")).await).await;

        assert_eq!(status, 400);
        assert_eq!(body["error"], "Full name is required");
    }

    #[tokio::test]
    async fn test_verify_again_updates_name() {
        let state = test_state().await;

        let Json(verified) = verify_user(State(state.clone()), request("Ada", "08012345678"))
            .await
            .unwrap();
        assert_eq!(verified.status, "verified");
        let Json(verified) = verify_user(State(state.clone()), request("Ada Obi", "08012345678"))
            .await
            .unwrap();
        assert_eq!(verified.status, "verified");

        let user = database::user::get_user_by_phone(state.db.pool(), "08012345678")
            .await
            .unwrap();
        assert_eq!(user.full_name, "Ada Obi");
        assert_eq!(database::user::count_users(state.db.pool()).await.unwrap(), 1);
    }
}
