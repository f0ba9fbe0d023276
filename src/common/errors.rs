use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Failures raised while talking to the upstream catalog or validating input.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The upstream answered with a non-2xx status.
    #[error("upstream responded with {status}: {message}")]
    Upstream { status: u16, message: String },
    /// Connection, timeout or body read failure.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode upstream response: {0}")]
    Decode(String),
    /// A value required to continue was absent from an earlier upstream reply.
    #[error("{0}")]
    MissingPrecondition(String),
    #[error("{0}")]
    InvalidDownloadUrl(String),
    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
    #[error("invalid upstream url: {0}")]
    Url(#[from] url::ParseError),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidDownloadUrl(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Attaches the route-level summary shown in the `message` field.
    pub fn with_message(self, message: impl Into<String>) -> RouteFailure {
        RouteFailure {
            message: message.into(),
            cause: self,
        }
    }
}

/// Gateway JSON error response format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Always `"error"`.
    pub status: &'static str,
    /// Human-readable summary of what the route was doing.
    pub message: String,
    /// The underlying failure.
    pub error: String,
    /// Only present on route-not-found responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_endpoints: Option<Vec<&'static str>>,
}

impl ErrorEnvelope {
    pub fn bad_request(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
            error: error.into(),
            available_endpoints: None,
        }
    }

    pub fn internal(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
            error: error.into(),
            available_endpoints: None,
        }
    }

    pub fn not_found(path: impl AsRef<str>, endpoints: &[&'static str]) -> Self {
        Self {
            status: "error",
            message: "Endpoint not found".into(),
            error: format!("No route matches {}", path.as_ref()),
            available_endpoints: Some(endpoints.to_vec()),
        }
    }
}

/// A [`GatewayError`] bound to the route summary it is reported under.
#[derive(Debug)]
pub struct RouteFailure {
    pub message: String,
    pub cause: GatewayError,
}

impl IntoResponse for RouteFailure {
    fn into_response(self) -> Response {
        let status = self.cause.status_code();
        let body = if status == StatusCode::BAD_REQUEST {
            ErrorEnvelope::bad_request(self.message, self.cause.to_string())
        } else {
            ErrorEnvelope::internal(self.message, self.cause.to_string())
        };
        (status, Json(body)).into_response()
    }
}
