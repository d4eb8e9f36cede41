//! Admin authentication.
//!
//! The admin logs in with a username and password and receives a token
//! derived from those credentials. Every admin request then presents the
//! token, checked per request by the [`AdminSession`] extractor; the server
//! keeps no session state.

use axum::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::ApiError;
use crate::state::AppState;

/// Header checked after `Authorization`.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Configured admin credentials.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
    secret: String,
}

impl AdminCredentials {
    /// Token secret used when none is configured.
    pub const DEFAULT_SECRET: &'static str = "biztools_admin_secret";

    const DEFAULT_PASSWORD: &'static str = "admin123";

    /// Create credentials from a username, password and token secret.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            secret: secret.into(),
        }
    }

    /// The token handed out on login: hex SHA-256 of `username:password:secret`.
    pub fn token(&self) -> String {
        let digest = Sha256::digest(
            format!("{}:{}:{}", self.username, self.password, self.secret).as_bytes(),
        );
        hex::encode(digest)
    }

    /// Check a login attempt, returning the token on success.
    pub fn login(&self, username: &str, password: &str) -> Option<String> {
        if username == self.username && password == self.password {
            Some(self.token())
        } else {
            None
        }
    }

    /// Whether a presented token is valid.
    pub fn accepts(&self, token: &str) -> bool {
        !token.is_empty() && token == self.token()
    }

    /// Whether the password is still the shipped default.
    pub fn is_default_password(&self) -> bool {
        self.password == Self::DEFAULT_PASSWORD
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Proof that the request carried a valid admin token.
///
/// Add it as a handler argument (before any body extractor) to gate an
/// endpoint.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession;

#[derive(Deserialize)]
struct TokenQuery {
    admin_token: Option<String>,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = presented_token(parts);

        if !state.admin.accepts(&token) {
            return Err(ApiError::Unauthorized("Unauthorized. Admin login required."));
        }

        Ok(AdminSession)
    }
}

/// Find the token a request presents.
///
/// Checked in order: `Authorization`, `X-Admin-Token` (both with an optional
/// `Bearer ` prefix), then the `admin_token` query parameter.
pub fn presented_token(parts: &Parts) -> String {
    if let Some(token) = header_token(&parts.headers) {
        return token;
    }

    Query::<TokenQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(query)| query.admin_token)
        .map(|token| token.trim().to_string())
        .unwrap_or_default()
}

fn header_token(headers: &HeaderMap) -> Option<String> {
    [header::AUTHORIZATION.as_str(), ADMIN_TOKEN_HEADER]
        .into_iter()
        .filter_map(|name| headers.get(name))
        .filter_map(|value| value.to_str().ok())
        .map(|value| {
            let value = value.trim_start();
            value.strip_prefix("Bearer ").unwrap_or(value).trim()
        })
        .find(|token| !token.is_empty())
        .map(str::to_string)
}
