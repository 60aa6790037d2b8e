use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::instrument;

use super::{
    plain_rejection,
    types::{AdminSessionResponse, FacultySessionResponse, LoginRequest, LoginResponse},
};
use crate::aula::auth::{AuthState, LoginOutcome};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Session token, or the course list when a choice is required", body = LoginResponse),
        (status = 400, description = "Email and password are required", body = String),
        (status = 401, description = "Invalid credentials", body = String),
        (status = 403, description = "No course assignment", body = String),
        (status = 500, description = "Server error", body = String),
    ),
    tag = "auth"
)]
#[instrument(skip(auth, payload))]
pub async fn login(
    auth: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    match auth
        .login(request.email.as_deref(), request.secret.as_deref())
        .await
    {
        Ok(outcome) => {
            let body = match outcome {
                LoginOutcome::Administrator(session) => {
                    LoginResponse::Administrator(AdminSessionResponse::from(session))
                }
                LoginOutcome::Faculty(session) => {
                    LoginResponse::Faculty(FacultySessionResponse::from(session))
                }
                LoginOutcome::SelectionRequired(pending) => {
                    LoginResponse::SelectionRequired(pending.into())
                }
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => plain_rejection(&err),
    }
}
