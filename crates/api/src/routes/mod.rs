//! Route table for the JSON API.

pub mod admin;
pub mod calculate;
pub mod health;
pub mod history;
pub mod user;

use std::time::Duration;

use axum::extract::Request;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::request::Parts;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, MethodRouter};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::auth::ADMIN_TOKEN_HEADER;
use crate::error::ApiError;
use crate::state::AppState;

/// Build the complete application: routes, CORS and state.
pub fn app(state: AppState, cors_any: bool) -> Router {
    router()
        .layer(cors_layer(cors_any))
        .layer(middleware::from_fn(preflight_no_content))
        .with_state(state)
}

/// Build the router with all routes.
///
/// Each endpoint answers at `/<name>` and `/<name>.php`.
pub fn router() -> Router<AppState> {
    let routes = [
        // Health checks
        ("health", get(health::health)),
        ("check-db", get(health::check_db)),
        // Calculators
        ("calculate-bid", post(calculate::calculate_bid)),
        ("calculate-total", post(calculate::calculate_total)),
        ("calculate-profit", post(calculate::calculate_profit)),
        // Users and history
        ("verify-user", post(user::verify_user)),
        ("history-list", get(history::list_history)),
        ("history-save", post(history::save_history)),
        ("history-delete", post(history::delete_history)),
        // Admin
        ("admin-login", post(admin::login)),
        ("admin-users", get(admin::list_users)),
        ("admin-user-detail", get(admin::user_detail)),
        ("admin-user-update", post(admin::update_user)),
        ("admin-user-delete", post(admin::delete_user)),
        ("admin-history-update", post(admin::update_history)),
        ("admin-history-delete", post(admin::delete_history)),
    ];

    routes
        .into_iter()
        .fold(Router::new(), |router, (name, method_router)| {
            endpoint(router, name, method_router)
        })
        .fallback(not_found)
}

fn endpoint(
    router: Router<AppState>,
    name: &str,
    method_router: MethodRouter<AppState>,
) -> Router<AppState> {
    let method_router = method_router.fallback(method_fallback);
    router
        .route(&format!("/{name}"), method_router.clone())
        .route(&format!("/{name}.php"), method_router)
}

async fn method_fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        ApiError::MethodNotAllowed.into_response()
    }
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".into())
}

/// CORS policy: local development origins only, or any origin when `any_origin` is set.
pub fn cors_layer(any_origin: bool) -> CorsLayer {
    let origin = if any_origin {
        AllowOrigin::any()
    } else {
        AllowOrigin::predicate(|origin: &HeaderValue, _: &Parts| is_local_origin(origin))
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static(ADMIN_TOKEN_HEADER),
        ])
        .max_age(Duration::from_secs(60 * 60))
}

/// Answer successful `OPTIONS` requests, preflights included, with 204.
async fn preflight_no_content(request: Request, next: Next) -> Response {
    let is_options = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;
    if is_options && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

fn is_local_origin(origin: &HeaderValue) -> bool {
    origin
        .to_str()
        .map(|origin| origin.contains("localhost") || origin.contains("127.0.0.1"))
        .unwrap_or(false)
}
