use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, header},
    response::Json,
};
use serde_json::Value;

use crate::{
    common::RouteFailure,
    protocol::{SearchQuery, SourcesQuery, Success, TrendingQuery},
    server::AppState,
    transport::extract::{ApiPath, ApiQuery},
};

type JsonResult = Result<Json<Success<Value>>, RouteFailure>;

/// `scheme://host` the caller used to reach this gateway, honouring the
/// usual reverse-proxy headers.
pub fn gateway_base(headers: &HeaderMap) -> String {
    let first = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let host = first("x-forwarded-host")
        .or_else(|| first(header::HOST.as_str()))
        .unwrap_or("localhost");
    let scheme = first("x-forwarded-proto").unwrap_or("http");
    format!("{}://{}", scheme, host)
}

/// GET /api/homepage
pub async fn homepage(State(state): State<Arc<AppState>>) -> JsonResult {
    tracing::info!("GET /api/homepage");
    let data = state
        .moviebox
        .homepage()
        .await
        .map_err(|e| e.with_message("Failed to fetch homepage content"))?;
    Ok(Json(Success::new(data)))
}

/// GET /api/trending?page=&perPage=
pub async fn trending(
    ApiQuery(params): ApiQuery<TrendingQuery>,
    State(state): State<Arc<AppState>>,
) -> JsonResult {
    let (page, per_page) = (params.page(), params.per_page());
    tracing::info!("GET /api/trending page={} perPage={}", page, per_page);

    let data = state
        .moviebox
        .trending(page, per_page)
        .await
        .map_err(|e| e.with_message("Failed to fetch trending content"))?;
    Ok(Json(Success::new(data)))
}

/// GET /api/search/{query}?page=&perPage=&type=
pub async fn search(
    ApiPath(query): ApiPath<String>,
    ApiQuery(params): ApiQuery<SearchQuery>,
    State(state): State<Arc<AppState>>,
) -> JsonResult {
    let subject_type = params.subject_type();
    tracing::info!(
        "GET /api/search/{} page={} perPage={} type={}",
        query,
        params.page(),
        params.per_page(),
        subject_type
    );

    let data = state
        .moviebox
        .search(&query, params.page(), params.per_page(), subject_type)
        .await
        .map_err(|e| e.with_message("Failed to search content"))?;
    Ok(Json(Success::new(data)))
}

/// GET /api/info/{movieId}
pub async fn subject_info(
    ApiPath(movie_id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
) -> JsonResult {
    tracing::info!("GET /api/info/{}", movie_id);
    let data = state
        .moviebox
        .detail(&movie_id)
        .await
        .map_err(|e| e.with_message("Failed to fetch movie info"))?;
    Ok(Json(Success::new(data)))
}

/// GET /api/sources/{movieId}?season=&episode=
pub async fn sources(
    ApiPath(movie_id): ApiPath<String>,
    ApiQuery(params): ApiQuery<SourcesQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> JsonResult {
    let (season, episode) = (params.season(), params.episode());
    tracing::info!(
        "GET /api/sources/{} season={} episode={}",
        movie_id,
        season,
        episode
    );

    let data = state
        .moviebox
        .download_sources(&movie_id, season, episode, &gateway_base(&headers))
        .await
        .map_err(|e| e.with_message("Failed to fetch streaming sources"))?;
    Ok(Json(Success::new(data)))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn base_comes_from_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("gw.local:5000"));
        assert_eq!(gateway_base(&headers), "http://gw.local:5000");
    }

    #[test]
    fn forwarded_headers_take_priority() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("10.0.0.4:5000"));
        headers.insert("x-forwarded-host", HeaderValue::from_static("api.example.com"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https, http"));
        assert_eq!(gateway_base(&headers), "https://api.example.com");
    }

    #[test]
    fn missing_host_falls_back_to_localhost() {
        assert_eq!(gateway_base(&HeaderMap::new()), "http://localhost");
    }
}
