//! HTTP routes for the development server.
//!
//! Path classification is the only glue: `/api/chat` and `/health` are
//! routed to handlers, everything else falls through to the static site
//! directory with a JSON 404 for unresolved paths.

pub mod chat;
pub mod health;

use std::any::Any;
use std::sync::Arc;

use axum::{
    handler::HandlerWithoutStateExt,
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::Response,
    routing::{get, get_service},
    Router,
};
use bytes::Bytes;
use http_body_util::Full;
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir, trace::TraceLayer};
use tracing::error;

use crate::{error::AppError, AppState};

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // GET resolves against the site directory (ServeDir refuses traversal
    // outside the root); other methods on unknown paths get the JSON 404.
    let static_site = get_service(
        ServeDir::new(&state.config.static_root)
            .append_index_html_on_directories(true)
            .not_found_service(not_found.into_service()),
    )
    .fallback(not_found);

    Router::new()
        .route(
            "/api/chat",
            get(chat::chat_status)
                .post(chat::chat)
                .options(chat::chat_preflight),
        )
        .route("/health", get(health::health_check))
        .fallback_service(static_site)
        // Middleware is applied in reverse order (last added runs first):
        // CORS headers go on every response, including panic conversions.
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::map_response(apply_cors))
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

/// The site is opened from `file://` pages and other origins during
/// development, so every response carries permissive CORS headers.
async fn apply_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

/// Outermost request boundary: a panicking handler must not take down the
/// process or hang the client, so the fault is reported through the normal
/// chat envelope.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> axum::http::Response<Full<Bytes>> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(error = %detail, "request handler panicked");

    let body = serde_json::json!({
        "reply": format!("Service error: {detail}"),
        "response": format!("Service error: {detail}"),
        "ok": false,
    })
    .to_string();

    axum::http::Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
        .expect("static response parts are valid")
}
