use crate::api::{
    delegate::AuthDelegate,
    guard::{ProtectedPaths, RouteGuard, require_session},
    handlers::{auth_proxy, pages},
    routes::AUTH_PATTERN,
};
use anyhow::{Context, Result};
use axum::{
    Extension, Router,
    body::Body,
    extract::{DefaultBodyLimit, MatchedPath},
    http::{
        HeaderName, HeaderValue, Method, Request,
        header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE},
    },
    middleware,
    routing::{any, get},
};
use secrecy::{ExposeSecret, SecretString};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{Span, info, info_span};
use ulid::Ulid;
use utoipa_axum::router::OpenApiRouter;

pub mod delegate;
pub mod guard;
pub(crate) mod handlers;
pub mod routes;
pub mod storage;
pub mod types;
// OpenAPI router wiring and route registration live in openapi.rs.
mod openapi;

pub use handlers::pages::PageSettings;
pub use openapi::openapi;

/// Build the API router with all documented routes registered.
#[must_use]
pub fn router() -> OpenApiRouter {
    openapi::api_router()
}

/// Assemble the full application: documented routes, the auth pass-through,
/// page shells, CORS, request ids, tracing and the route guard.
///
/// No I/O happens here, so tests can drive the returned router directly.
pub fn app(
    pool: PgPool,
    delegate: Arc<AuthDelegate>,
    protected: ProtectedPaths,
    pages: PageSettings,
) -> Router {
    let guard = Arc::new(RouteGuard::new(delegate.clone(), protected));

    // Documented routes come from the OpenAPI router; the pass-through and
    // the pages are added on top. OPTIONS is answered by the CORS layer.
    let (router, _openapi) = router().split_for_parts();
    router
        .route(
            AUTH_PATTERN,
            any(auth_proxy::forward).layer(DefaultBodyLimit::max(auth_proxy::MAX_BODY_BYTES)),
        )
        .route("/", get(pages::landing))
        .route("/login", get(pages::login))
        .route("/signup", get(pages::signup))
        .route("/dashboard", get(pages::dashboard))
        .route("/dashboard/*rest", get(pages::dashboard))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors_layer())
                .layer(middleware::from_fn_with_state(guard, require_session))
                .layer(Extension(delegate))
                .layer(Extension(Arc::new(pages)))
                .layer(Extension(pool)),
        )
}

/// Reflect the caller's origin and allow credentials so session cookies
/// survive cross-origin calls from the front end.
#[must_use]
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .expose_headers([CONTENT_LENGTH])
        .max_age(Duration::from_secs(600))
        .allow_credentials(true)
}

/// Connect the pool with the bounds used by every environment.
///
/// # Errors
/// Returns an error if the database cannot be reached.
pub async fn connect(dsn: &SecretString) -> Result<PgPool> {
    PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(dsn.expose_secret())
        .await
        .context("Failed to connect to database")
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(
    port: u16,
    dsn: SecretString,
    delegate: AuthDelegate,
    protected: ProtectedPaths,
    pages: PageSettings,
) -> Result<()> {
    let pool = connect(&dsn).await?;

    info!(
        delegate = delegate.base_url(),
        protected = protected.prefix(),
        "Auth delegate configured"
    );

    let app = app(pool, Arc::new(delegate), protected, pages);

    let listener = TcpListener::bind(format!("::0:{port}"))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!("Listening on [::]:{}", port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Gracefully shutdown");
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
