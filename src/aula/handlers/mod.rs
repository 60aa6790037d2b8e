pub mod health;
pub use self::health::health;

pub mod login;
pub use self::login::login;

pub mod probe;
pub use self::probe::{check_user, manual_login};

pub mod select_course;
pub use self::select_course::select_course;

pub mod types;


// common functions for the handlers
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error};

use crate::aula::auth::AuthError;
use types::ProbeFailure;

fn log_rejection(err: &AuthError) {
    if err.is_internal() {
        error!("Authentication failed on the server side: {err:?}");
    } else {
        debug!("Request rejected: {err}");
    }
}

/// Status code plus the message as plain text.
pub(crate) fn plain_rejection(err: &AuthError) -> Response {
    log_rejection(err);
    (err.status_code(), err.to_string()).into_response()
}

/// Status code plus `{success: false, message}`.
pub(crate) fn json_rejection(err: &AuthError) -> Response {
    log_rejection(err);
    (err.status_code(), Json(ProbeFailure::new(err.to_string()))).into_response()
}
