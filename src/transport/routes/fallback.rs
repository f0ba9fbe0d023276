use axum::{
    extract::OriginalUri,
    http::{Method, StatusCode},
    response::Json,
};

use crate::common::ErrorEnvelope;

pub const AVAILABLE_ENDPOINTS: &[&str] = &[
    "GET /api/homepage",
    "GET /api/trending?page=0&perPage=18",
    "GET /api/search/:query?page=1&perPage=24&type=0",
    "GET /api/info/:movieId",
    "GET /api/sources/:movieId?season=0&episode=0",
    "GET /api/download/:encodedUrl",
    "GET /api/status",
];

pub async fn not_found(
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> (StatusCode, Json<ErrorEnvelope>) {
    tracing::debug!("No route for {} {}", method, uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(ErrorEnvelope::not_found(
            format!("{} {}", method, uri.path()),
            AVAILABLE_ENDPOINTS,
        )),
    )
}
