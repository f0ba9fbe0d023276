use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    server::AppState,
    transport::{middleware::short_circuit_options, routes},
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/homepage", get(routes::homepage))
        .route("/api/trending", get(routes::trending))
        .route("/api/search/{query}", get(routes::search))
        .route("/api/info/{movie_id}", get(routes::subject_info))
        .route("/api/sources/{movie_id}", get(routes::sources))
        .route("/api/download/{*url}", get(routes::download))
        .route("/api/status", get(routes::get_status))
        .fallback(routes::not_found)
        .method_not_allowed_fallback(routes::not_found)
        .layer(middleware::from_fn(short_circuit_options))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
