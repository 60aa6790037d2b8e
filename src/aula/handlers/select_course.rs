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
    types::{FacultySessionResponse, SelectCourseRequest},
};
use crate::aula::auth::AuthState;

#[utoipa::path(
    post,
    path = "/api/auth/select-course",
    request_body = SelectCourseRequest,
    responses (
        (status = 200, description = "Session token bound to the chosen course", body = FacultySessionResponse),
        (status = 400, description = "User ID and Course ID are required", body = String),
        (status = 403, description = "Course not assigned to the user, or invalid selection ticket", body = String),
        (status = 404, description = "User not found", body = String),
        (status = 500, description = "Server error", body = String),
    ),
    tag = "auth"
)]
#[instrument(skip(auth, payload))]
pub async fn select_course(
    auth: Extension<Arc<AuthState>>,
    payload: Option<Json<SelectCourseRequest>>,
) -> Response {
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    match auth
        .select_course(
            request.identity_id,
            request.chosen_course_id,
            request.selection_ticket.as_deref(),
        )
        .await
    {
        Ok(session) => (StatusCode::OK, Json(FacultySessionResponse::from(session))).into_response(),
        Err(err) => plain_rejection(&err),
    }
}
