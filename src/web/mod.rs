//! Router assembly and serving.
//!
//! Layer order (outermost first): request-id stamping and propagation, HTTP
//! trace spans, shared state, the route guard, then the session provider —
//! so the guard answers before any hydration work happens for a denied
//! request.

pub mod guard;
pub mod handlers;
pub mod middleware;
pub mod templates;

use crate::auth::client::ExchangeClient;
use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{
        header::LOCATION, HeaderMap, HeaderName, HeaderValue, Request as HttpRequest, StatusCode,
    },
    middleware::from_fn,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;

#[derive(Clone)]
pub struct AppState {
    pub exchange: Arc<ExchangeClient>,
    pub guard: guard::GuardConfig,
}

/// Build the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::pages::root))
        .route("/home", get(handlers::pages::home))
        .route(
            "/login",
            get(handlers::auth::login_form).post(handlers::auth::login_submit),
        )
        .route(
            "/register",
            get(handlers::auth::register_form).post(handlers::auth::register_submit),
        )
        .route("/logout", post(handlers::auth::logout))
        .route("/profile", get(handlers::pages::profile))
        .route("/admin", get(handlers::pages::admin_dashboard))
        .route("/admin/:section", get(handlers::pages::admin_section))
        .route("/health", get(handlers::health::health))
        .fallback(handlers::pages::not_found)
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
                .layer(Extension(state))
                .layer(from_fn(guard::intercept))
                .layer(from_fn(middleware::provide_session)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn serve(port: u16, state: AppState) -> Result<()> {
    let app = router(state);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn make_span(request: &HttpRequest<Body>) -> Span {
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

/// `302 Found` toward `location`; the redirect class the guard and the
/// root route answer with.
pub(crate) fn found(location: &str) -> Response {
    redirect(StatusCode::FOUND, location, HeaderMap::new())
}

/// `303 See Other` after a form POST, so browsers re-request with GET.
pub(crate) fn see_other(location: &str, headers: HeaderMap) -> Response {
    redirect(StatusCode::SEE_OTHER, location, headers)
}

fn redirect(status: StatusCode, location: &str, mut headers: HeaderMap) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            headers.insert(LOCATION, value);
            (status, headers).into_response()
        }
        Err(err) => {
            tracing::error!("invalid redirect target {location}: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
