use axum::{
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Answers every `OPTIONS` request with an empty 200. CORS headers are added
/// by the outer `CorsLayer`.
pub async fn short_circuit_options(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        tracing::debug!("OPTIONS {}", req.uri().path());
        return StatusCode::OK.into_response();
    }
    next.run(req).await
}
