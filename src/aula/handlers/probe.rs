//! Auxiliary entry points issuing short-lived generic tokens.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::instrument;

use super::{
    json_rejection,
    types::{CheckUserRequest, LoginRequest, ProbeFailure, ProbeResponse},
};
use crate::aula::auth::AuthState;

#[utoipa::path(
    post,
    path = "/api/auth/check-user",
    request_body = CheckUserRequest,
    responses (
        (status = 200, description = "Identity exists", body = ProbeResponse),
        (status = 400, description = "Email is required", body = ProbeFailure),
        (status = 404, description = "User not found", body = ProbeFailure),
        (status = 500, description = "Server error", body = ProbeFailure),
    ),
    tag = "auth"
)]
#[instrument(skip(auth, payload))]
pub async fn check_user(
    auth: Extension<Arc<AuthState>>,
    payload: Option<Json<CheckUserRequest>>,
) -> Response {
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    match auth.check_user(request.email.as_deref()).await {
        Ok(session) => (StatusCode::OK, Json(ProbeResponse::from(session))).into_response(),
        Err(err) => json_rejection(&err),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/manual-login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Credentials match", body = ProbeResponse),
        (status = 400, description = "Email and password are required", body = ProbeFailure),
        (status = 401, description = "Invalid credentials", body = ProbeFailure),
        (status = 500, description = "Server error", body = ProbeFailure),
    ),
    tag = "auth"
)]
#[instrument(skip(auth, payload))]
pub async fn manual_login(
    auth: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    match auth
        .manual_login(request.email.as_deref(), request.secret.as_deref())
        .await
    {
        Ok(session) => (StatusCode::OK, Json(ProbeResponse::from(session))).into_response(),
        Err(err) => json_rejection(&err),
    }
}
