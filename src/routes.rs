// routes.rs
use axum::{
    routing::{get, post},
    Router,
};
use http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, AppState};

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/polls",
            get(handlers::list_polls).post(handlers::create_poll),
        )
        .route("/api/polls/{poll_id}", get(handlers::get_poll))
        .route("/api/polls/{poll_id}/vote", post(handlers::vote))
        .route("/api/polls/{poll_id}/results", get(handlers::get_results))
        .with_state(state)
}

pub fn cors_layer(origin: Option<&HeaderValue>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([http::header::CONTENT_TYPE, http::header::ACCEPT]);

    match origin {
        Some(origin) => cors.allow_origin(origin.clone()),
        None => cors.allow_origin(Any),
    }
}

/// Full application router with tracing and CORS layers.
pub fn app(state: AppState, origin: Option<&HeaderValue>) -> Router {
    create_routes(state)
        .layer(cors_layer(origin))
        .layer(TraceLayer::new_for_http())
}
