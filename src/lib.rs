use crate::config::AppConfig;
use crate::errors::{not_found, ApiError};
use crate::route::verify_api;
use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

pub mod config;
pub mod errors;
pub mod model;
pub mod route;
pub mod service;
pub mod util;

// Application state shared across handlers
// The config is read once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        AppState {
            config: Arc::new(config),
        }
    }
}

// Application router creation
// Note: The order of layers is important.
// https://docs.rs/axum/latest/axum/middleware/index.html#ordering
pub fn create_app(state: AppState) -> Result<Router> {
    let config = &state.config;
    let max_body_size = usize::try_from(config.http.max_body_size).unwrap_or(usize::MAX);

    let mut app = Router::new()
        .merge(verify_api::create_routes())
        .fallback(handle_404)
        .method_not_allowed_fallback(handle_405)
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(DefaultBodyLimit::max(max_body_size))
                .layer(config.http.cors.clone().into_layer()?),
        );

    if config.log.log_requests {
        app = app.layer(TraceLayer::new_for_http());
    }
    Ok(app.with_state(state))
}

pub async fn handle_404(uri: Uri) -> ApiError {
    not_found(&format!("No route for {}", uri.path()))
}

async fn handle_405() -> ApiError {
    ApiError::MethodNotAllowed
}

// Custom panic handler, logs the panic and returns a 500 response
fn handle_panic(panic: Box<dyn std::any::Any + Send>) -> Response {
    let panic_message = if let Some(s) = panic.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "Unknown panic"
    };

    error!("App panicked: {}", panic_message);
    ApiError::ServerError(panic_message.to_string()).into_response()
}
