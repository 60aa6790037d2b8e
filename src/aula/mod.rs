//! HTTP service: routes, middleware and server bootstrap.

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer, request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug_span, info, Span};
use ulid::Ulid;
use url::Url;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod handlers;
pub mod openapi;

use auth::{AuthConfig, AuthState, PgCredentialStore};

/// Routes of the service with the shared auth state attached.
#[must_use]
pub fn router(auth: Arc<AuthState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health).options(handlers::health))
        .route("/api/auth/check-user", post(handlers::check_user))
        .route("/api/auth/manual-login", post(handlers::manual_login))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/select-course", post(handlers::select_course))
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
        .layer(Extension(auth))
}

/// Origin of the frontend, the only one CORS lets through.
///
/// # Errors
/// Returns an error if the URL can't be parsed or has no usable origin
pub fn frontend_origin(frontend_base_url: &str) -> Result<HeaderValue> {
    let url = Url::parse(frontend_base_url)
        .with_context(|| format!("Invalid frontend base URL: {frontend_base_url}"))?;

    let origin = url.origin();
    if !origin.is_tuple() {
        anyhow::bail!("Frontend base URL has no origin: {frontend_base_url}");
    }

    HeaderValue::from_str(&origin.ascii_serialization())
        .context("Frontend origin is not a valid header value")
}

/// router
/// # Errors
/// Returns an error if the server fails to start
pub async fn new(
    port: u16,
    dsn: String,
    auth_config: AuthConfig,
    frontend_base_url: &str,
) -> Result<()> {
    // Connect to database
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(&dsn)
        .await
        .context("Failed to connect to database")?;

    let store = Arc::new(PgCredentialStore::new(pool));
    let auth = Arc::new(AuthState::new(auth_config, store));

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_origin(frontend_origin(frontend_base_url)?);

    let app = router(auth).layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(cors),
    );

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", err);
            }
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let headers = request.headers();
    let path = request.uri().path();
    let request_id = headers
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!("http-request", path, request_id)
}
