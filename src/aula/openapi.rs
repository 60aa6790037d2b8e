use utoipa::OpenApi;

use crate::aula::{
    auth::{AdminUser, CourseAssignment, FacultyUser, PendingUser, Role},
    handlers::{self, types},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::probe::check_user,
        handlers::probe::manual_login,
        handlers::login::login,
        handlers::select_course::select_course,
    ),
    components(
        schemas(
            handlers::health::Health,
            types::CheckUserRequest,
            types::LoginRequest,
            types::SelectCourseRequest,
            types::AdminSessionResponse,
            types::FacultySessionResponse,
            types::SelectionRequiredResponse,
            types::LoginResponse,
            types::ProbeUser,
            types::ProbeResponse,
            types::ProbeFailure,
            AdminUser,
            FacultyUser,
            PendingUser,
            CourseAssignment,
            Role,
        )
    ),
    tags(
        (name = "auth", description = "Staff login and course scoping"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;
