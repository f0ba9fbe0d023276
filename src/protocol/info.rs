use serde::Serialize;

use crate::sources::moviebox::SessionStatus;

/// Response of `/api/status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusInfo {
    pub version: String,
    pub build_time: u64,
    pub git: GitInfo,
    pub upstream_host: String,
    pub session: SessionInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitInfo {
    pub branch: String,
    pub commit: String,
    pub commit_time: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub status: SessionStatus,
    pub bootstrap_attempts: u64,
    pub has_app_info: bool,
}
