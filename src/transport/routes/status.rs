use std::sync::Arc;

use axum::{extract::State, response::Json};

use crate::{
    protocol::{GitInfo, SessionInfo, StatusInfo, Success},
    server::AppState,
};

/// GET /api/status
///
/// Reports the session state without triggering a bootstrap.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<Success<StatusInfo>> {
    tracing::debug!("GET /api/status");
    let session = state.moviebox.session();

    Json(Success::new(StatusInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        build_time: option_env!("BUILD_TIME")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0),
        git: GitInfo {
            branch: option_env!("GIT_BRANCH").unwrap_or("unknown").to_string(),
            commit: option_env!("GIT_COMMIT").unwrap_or("unknown").to_string(),
            commit_time: option_env!("GIT_COMMIT_TIME")
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
        },
        upstream_host: state.moviebox.host().to_string(),
        session: SessionInfo {
            status: session.status(),
            bootstrap_attempts: session.bootstrap_attempts(),
            has_app_info: session.app_info().is_some(),
        },
    }))
}
