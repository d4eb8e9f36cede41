//! Request extractors.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON body extractor that answers with the API error envelope.
///
/// Any body that is missing, malformed, or of the wrong shape is rejected
/// with `400 {"error": "Invalid JSON"}` instead of axum's plain-text
/// rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor that answers with the API error envelope.
///
/// A query string that cannot be decoded (a repeated field, for one) is
/// rejected with `400 {"error": "Invalid query"}`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
