use axum::{
    extract::{FromRequestParts, Path, Query},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Json, Response},
};
use serde::de::DeserializeOwned;

use crate::common::ErrorEnvelope;

/// Extractor failure reported in the gateway's JSON error shape instead of
/// axum's plain-text body.
#[derive(Debug)]
pub struct Rejected {
    status: StatusCode,
    message: &'static str,
    error: String,
}

impl IntoResponse for Rejected {
    fn into_response(self) -> Response {
        tracing::warn!("{}: {}", self.message, self.error);
        let body = if self.status.is_client_error() {
            ErrorEnvelope::bad_request(self.message, self.error)
        } else {
            ErrorEnvelope::internal(self.message, self.error)
        };
        (self.status, Json(body)).into_response()
    }
}

/// [`Query`] whose rejection is a JSON error envelope.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Rejected;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(Rejected {
                status: rejection.status(),
                message: "Invalid query parameters",
                error: rejection.body_text(),
            }),
        }
    }
}

/// [`Path`] whose rejection is a JSON error envelope.
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Rejected;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(Rejected {
                status: rejection.status(),
                message: "Invalid path parameter",
                error: rejection.body_text(),
            }),
        }
    }
}
