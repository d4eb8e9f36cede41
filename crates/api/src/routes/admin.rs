//! Admin routes: login plus CRUD over users and their history.
//!
//! Every handler except [`login`] takes an [`AdminSession`], so a request
//! without a valid token is refused before its body is read.

use axum::extract::State;
use axum::Json;
use calculator::lenient;
use database::{DatabaseError, User, UserSummary, UserUpdate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::auth::AdminSession;
use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, ApiQuery};
use crate::routes::history::HistoryItem;
use crate::state::AppState;

/// Admin login request.
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "lenient::text")]
    pub username: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub password: String,
}

/// Admin login result.
#[derive(Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub token: String,
}

/// Generic mutation result.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// All users with calculation counts.
#[derive(Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserSummary>,
}

/// Query for a single user.
#[derive(Deserialize)]
pub struct DetailQuery {
    #[serde(default)]
    pub phone: String,
}

/// A user with their full history.
#[derive(Serialize)]
pub struct UserDetailResponse {
    pub user: User,
    pub history: Vec<HistoryItem>,
}

/// Request to rename a user and/or change their phone.
#[derive(Deserialize)]
pub struct UserUpdateRequest {
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub new_phone: String,
}

/// Request naming a user by phone.
#[derive(Deserialize)]
pub struct UserDeleteRequest {
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: String,
}

/// Request to replace the blobs of a history entry.
#[derive(Deserialize)]
pub struct HistoryUpdateRequest {
    #[serde(default, deserialize_with = "lenient::integer")]
    pub id: i64,
    #[serde(default)]
    pub input_data: Option<Value>,
    #[serde(default)]
    pub output_data: Option<Value>,
}

/// Request naming a history entry.
#[derive(Deserialize)]
pub struct HistoryDeleteRequest {
    #[serde(default, deserialize_with = "lenient::integer")]
    pub id: i64,
}

/// Exchange admin credentials for a token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let token = state
        .admin
        .login(req.username.trim(), &req.password)
        .ok_or(ApiError::Unauthorized("Invalid username or password"))?;

    info!("Admin logged in");

    Ok(Json(LoginResponse {
        status: "authenticated",
        token,
    }))
}

/// List all users with their calculation counts.
pub async fn list_users(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<UsersResponse>> {
    let users = database::user::list_users_with_counts(state.db.pool()).await?;
    Ok(Json(UsersResponse { users }))
}

/// Fetch one user and their history.
pub async fn user_detail(
    _admin: AdminSession,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DetailQuery>,
) -> Result<Json<UserDetailResponse>> {
    if query.phone.is_empty() {
        return Err(ApiError::BadRequest("Phone parameter is required".into()));
    }

    let pool = state.db.pool();
    let user = database::user::get_user_by_phone(pool, &query.phone).await?;
    let history = database::history::list_entries(pool, &query.phone).await?;

    Ok(Json(UserDetailResponse {
        user,
        history: history.into_iter().map(HistoryItem::from).collect(),
    }))
}

/// Rename a user and/or move them to a new phone number.
pub async fn update_user(
    _admin: AdminSession,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UserUpdateRequest>,
) -> Result<Json<StatusResponse>> {
    let phone = req.phone.trim();
    if phone.is_empty() {
        return Err(ApiError::BadRequest("Current phone is required".into()));
    }

    let update = UserUpdate {
        full_name: Some(req.full_name.trim().to_string()),
        new_phone: Some(req.new_phone.trim().to_string()),
    };

    database::user::update_user(state.db.pool(), phone, &update)
        .await
        .map_err(|err| match err {
            DatabaseError::AlreadyExists { .. } => {
                ApiError::Conflict("Phone number already in use by another user".into())
            }
            other => ApiError::from(other),
        })?;

    info!(phone, "Admin updated user");

    Ok(Json(StatusResponse { status: "updated" }))
}

/// Delete a user and all their history.
pub async fn delete_user(
    _admin: AdminSession,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UserDeleteRequest>,
) -> Result<Json<StatusResponse>> {
    let phone = req.phone.trim();
    if phone.is_empty() {
        return Err(ApiError::BadRequest("Phone is required".into()));
    }

    let existed = database::user::delete_user(state.db.pool(), phone).await?;

    info!(phone, existed, "Admin deleted user");

    Ok(Json(StatusResponse { status: "deleted" }))
}

/// Replace the input and/or output blob of a history entry.
pub async fn update_history(
    _admin: AdminSession,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<HistoryUpdateRequest>,
) -> Result<Json<StatusResponse>> {
    if req.id <= 0 {
        return Err(ApiError::BadRequest("History ID is required".into()));
    }

    if req.input_data.is_none() && req.output_data.is_none() {
        return Err(ApiError::BadRequest("Nothing to update".into()));
    }

    let changed = database::history::update_entry(
        state.db.pool(),
        req.id,
        req.input_data.as_ref(),
        req.output_data.as_ref(),
    )
    .await?;

    info!(id = req.id, changed, "Admin updated history entry");

    Ok(Json(StatusResponse { status: "updated" }))
}

/// Delete a history entry by id.
pub async fn delete_history(
    _admin: AdminSession,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<HistoryDeleteRequest>,
) -> Result<Json<StatusResponse>> {
    if req.id <= 0 {
        return Err(ApiError::BadRequest("History ID is required".into()));
    }

    let removed = database::history::delete_entry_by_id(state.db.pool(), req.id).await?;

    info!(id = req.id, removed, "Admin deleted history entry");

    Ok(Json(StatusResponse { status: "deleted" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{json_body, test_state};
    use database::FeatureType;
    use serde_json::json;

    const PHONE: &str = "08011111111";

    async fn seed(state: &AppState) -> i64 {
        database::user::verify_user(state.db.pool(), "Ada", PHONE)
            .await
            .unwrap();
        database::history::insert_entry(
            state.db.pool(),
            PHONE,
            FeatureType::BudgetToBid,
            &json!({"target_total": 1000}),
            &json!({"estimated_bid": 900}),
        )
        .await
        .unwrap()
    }

    async fn detail(state: &AppState, phone: &str) -> (u16, Value) {
        json_body(
            user_detail(
                AdminSession,
                State(state.clone()),
                ApiQuery(DetailQuery {
                    phone: phone.to_string(),
                }),
            )
            .await,
        )
        .await
    }

    fn update_request(phone: &str, full_name: &str, new_phone: &str) -> ApiJson<UserUpdateRequest> {
        ApiJson(UserUpdateRequest {
            phone: phone.to_string(),
            full_name: full_name.to_string(),
            new_phone: new_phone.to_string(),
        })
    }

    #[tokio::test]
    async fn test_login() {
        let state = test_state().await;

        let (status, body) = json_body(
            login(
                State(state.clone()),
                ApiJson(LoginRequest {
                    username: " admin ".to_string(),
                    password: "admin123".to_string(),
                }),
            )
            .await,
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["status"], "authenticated");
        assert_eq!(body["token"], state.admin.token());

        let (status, body) = json_body(
            login(
                State(state),
                ApiJson(LoginRequest {
                    username: "admin".to_string(),
                    password: "guess".to_string(),
                }),
            )
            .await,
        )
        .await;
        assert_eq!(status, 401);
        assert_eq!(body["error"], "Invalid username or password");
    }

    #[tokio::test]
    async fn test_list_users_with_counts() {
        let state = test_state().await;
        seed(&state).await;

        let (status, body) = json_body(list_users(AdminSession, State(state)).await).await;
        assert_eq!(status, 200);
        assert_eq!(body["users"][0]["phone_number"], PHONE);
        assert_eq!(body["users"][0]["calculation_count"], 1);
    }

    #[tokio::test]
    async fn test_user_detail() {
        let state = test_state().await;
        let id = seed(&state).await;

        let (status, body) = detail(&state, PHONE).await;
        assert_eq!(status, 200);
        assert_eq!(body["user"]["full_name"], "Ada");
        assert_eq!(body["history"][0]["id"], id);
        assert_eq!(body["history"][0]["input_data"], json!({"target_total": 1000}));

        let (status, body) = detail(&state, "08099999999").await;
        assert_eq!(status, 404);
        assert_eq!(body["error"], "User not found");

        let (status, body) = detail(&state, "").await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Phone parameter is required");
    }

    #[tokio::test]
    async fn test_phone_change_moves_history() {
        let state = test_state().await;
        seed(&state).await;

        let (status, body) = json_body(
            update_user(
                AdminSession,
                State(state.clone()),
                update_request(PHONE, "Ada Obi", "08033333333"),
            )
            .await,
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({"status": "updated"}));

        let (status, body) = detail(&state, "08033333333").await;
        assert_eq!(status, 200);
        assert_eq!(body["user"]["full_name"], "Ada Obi");
        assert_eq!(body["history"].as_array().unwrap().len(), 1);

        let (status, _) = detail(&state, PHONE).await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_phone_change_conflict() {
        let state = test_state().await;
        seed(&state).await;
        database::user::verify_user(state.db.pool(), "Bayo", "08022222222")
            .await
            .unwrap();

        let (status, body) = json_body(
            update_user(
                AdminSession,
                State(state),
                update_request(PHONE, "", "08022222222"),
            )
            .await,
        )
        .await;
        assert_eq!(status, 409);
        assert_eq!(body["error"], "Phone number already in use by another user");
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let state = test_state().await;

        let (status, body) = json_body(
            update_user(
                AdminSession,
                State(state.clone()),
                update_request("08099999999", "Ghost", ""),
            )
            .await,
        )
        .await;
        assert_eq!(status, 404);
        assert_eq!(body["error"], "User not found");

        let (status, body) = json_body(
            update_user(AdminSession, State(state), update_request(" ", "Ghost", "")).await,
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Current phone is required");
    }

    #[tokio::test]
    async fn test_delete_user() {
        let state = test_state().await;
        seed(&state).await;

        let (status, body) = json_body(
            delete_user(
                AdminSession,
                State(state.clone()),
                ApiJson(UserDeleteRequest {
                    phone: PHONE.to_string(),
                }),
            )
            .await,
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({"status": "deleted"}));

        let (status, _) = detail(&state, PHONE).await;
        assert_eq!(status, 404);
        assert!(database::history::list_entries(state.db.pool(), PHONE)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_update_history() {
        let state = test_state().await;
        let id = seed(&state).await;

        let (status, _) = json_body(
            update_history(
                AdminSession,
                State(state.clone()),
                ApiJson(HistoryUpdateRequest {
                    id,
                    input_data: None,
                    output_data: Some(json!({"estimated_bid": 950})),
                }),
            )
            .await,
        )
        .await;
        assert_eq!(status, 200);

        let (_, body) = detail(&state, PHONE).await;
        assert_eq!(body["history"][0]["output_data"], json!({"estimated_bid": 950}));
        assert_eq!(body["history"][0]["input_data"], json!({"target_total": 1000}));
    }

    #[tokio::test]
    async fn test_update_history_validation() {
        let state = test_state().await;
        let id = seed(&state).await;

        let (status, body) = json_body(
            update_history(
                AdminSession,
                State(state.clone()),
                ApiJson(HistoryUpdateRequest {
                    id,
                    input_data: None,
                    output_data: None,
                }),
            )
            .await,
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Nothing to update");

        let (status, body) = json_body(
            update_history(
                AdminSession,
                State(state),
                ApiJson(HistoryUpdateRequest {
                    id: 0,
                    input_data: Some(json!({})),
                    output_data: None,
                }),
            )
            .await,
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "History ID is required");
    }

    #[tokio::test]
    async fn test_delete_history() {
        let state = test_state().await;
        let id = seed(&state).await;

        let (status, body) = json_body(
            delete_history(
                AdminSession,
                State(state.clone()),
                ApiJson(HistoryDeleteRequest { id }),
            )
            .await,
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({"status": "deleted"}));

        let (_, body) = detail(&state, PHONE).await;
        assert!(body["history"].as_array().unwrap().is_empty());
    }
}
