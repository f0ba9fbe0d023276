use std::sync::Arc;

use axum::{
    extract::{OriginalUri, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};

use crate::{
    server::AppState,
    sources::moviebox::{downloads::DOWNLOAD_ROUTE, helpers::truncate},
};

/// GET /api/download/{*url}
///
/// The raw path tail is used rather than the extracted segment so that the
/// target URL is percent-decoded exactly once.
pub async fn download(
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let tail = uri.path().strip_prefix(DOWNLOAD_ROUTE).unwrap_or_default();
    tracing::info!(
        "GET {}{} (Range: {:?})",
        DOWNLOAD_ROUTE,
        truncate(tail, 120),
        headers.get(header::RANGE)
    );

    let target = match state.downloads.resolve_target(tail, uri.query()) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Rejected download target: {}", e);
            return e.with_message("Invalid download URL").into_response();
        }
    };

    match state.downloads.open(&target, headers.get(header::RANGE)).await {
        Ok(upstream) => state.downloads.relay(upstream),
        Err(e) => e.with_message("Failed to download file").into_response(),
    }
}
