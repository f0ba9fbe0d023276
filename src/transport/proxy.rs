use std::{
    pin::Pin,
    task::{Context, Poll},
};

use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use bytes::Bytes;
use futures::{Stream, StreamExt, stream::BoxStream};
use reqwest::Url;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::{
    common::{ErrorEnvelope, GatewayError, GatewayResult, HttpClient},
    configs::DownloadConfig,
    sources::moviebox::helpers::truncate,
};

/// Failure on the byte channel after the response head was sent. Kept apart
/// from [`GatewayError`] because it can no longer become a JSON reply.
#[derive(Debug, Error)]
pub enum ProxyStreamError {
    #[error("upstream stream from {target} failed after {bytes_sent} bytes: {source}")]
    Upstream {
        target: String,
        bytes_sent: u64,
        #[source]
        source: reqwest::Error,
    },
}

/// Relays files from the allow-listed CDN origins with the spoofed browser
/// headers the CDN expects.
pub struct DownloadProxy {
    client: reqwest::Client,
    config: DownloadConfig,
}

impl DownloadProxy {
    pub fn new(config: DownloadConfig) -> Result<Self, String> {
        let client = HttpClient::streaming(&config).map_err(|e| e.to_string())?;
        Ok(Self { client, config })
    }

    pub fn is_allowed(&self, url: &Url) -> bool {
        let origin = url.origin().ascii_serialization();
        self.config
            .allowed_origins
            .iter()
            .any(|allowed| allowed.trim_end_matches('/').eq_ignore_ascii_case(&origin))
    }

    /// Percent-decodes the path tail once and checks the result against the
    /// allow-list. No network I/O happens here.
    ///
    /// `raw_query` is re-attached only when the tail was sent unencoded, i.e.
    /// the caller's `?` split the target URL.
    pub fn resolve_target(&self, raw_tail: &str, raw_query: Option<&str>) -> GatewayResult<Url> {
        let decoded = urlencoding::decode(raw_tail).map_err(|e| {
            GatewayError::InvalidDownloadUrl(format!("download URL is not valid UTF-8: {}", e))
        })?;

        let mut target = decoded.into_owned();
        if let Some(query) = raw_query.filter(|q| !q.is_empty()) {
            if !target.contains('?') {
                target.push('?');
                target.push_str(query);
            }
        }

        let url = Url::parse(&target).map_err(|e| {
            GatewayError::InvalidDownloadUrl(format!(
                "'{}' is not a valid URL: {}",
                truncate(&target, 120),
                e
            ))
        })?;

        if !self.is_allowed(&url) {
            return Err(GatewayError::InvalidDownloadUrl(format!(
                "Only downloads from {} are allowed",
                self.config.allowed_origins.join(", ")
            )));
        }
        Ok(url)
    }

    /// Opens the upstream transfer. A non-2xx answer is reported here, while
    /// a JSON error can still be sent.
    pub async fn open(
        &self,
        target: &Url,
        range: Option<&HeaderValue>,
    ) -> GatewayResult<reqwest::Response> {
        let mut request = self
            .client
            .get(target.clone())
            .header(header::REFERER, &self.config.referer)
            .header(header::ORIGIN, &self.config.origin)
            .header(header::ACCEPT, "*/*");
        if let Some(range) = range {
            request = request.header(header::RANGE, range);
        }

        let host = target.host_str().unwrap_or("?");
        let response = request
            .send()
            .await
            .inspect_err(|e| error!("Download request to {} failed: {}", host, e))?;

        let status = response.status();
        if !status.is_success() {
            error!("Download upstream {} responded {}", host, status);
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }
        Ok(response)
    }

    /// Streams `upstream` back with its type/length/range headers and a
    /// fixed attachment filename.
    pub fn relay(&self, upstream: reqwest::Response) -> Response {
        let status = upstream.status();
        let target = upstream
            .url()
            .host_str()
            .unwrap_or("upstream")
            .to_string();
        let mut builder = Response::builder().status(status);

        let content_type = upstream
            .headers()
            .get(header::CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));
        builder = builder.header(header::CONTENT_TYPE, content_type);

        for name in [header::CONTENT_LENGTH, header::CONTENT_RANGE, header::ACCEPT_RANGES] {
            if let Some(value) = upstream.headers().get(&name) {
                builder = builder.header(name, value.clone());
            }
        }
        builder = builder.header(
            header::CONTENT_DISPOSITION,
            self.config.content_disposition(),
        );

        debug!("Relaying download from {} ({})", target, status);
        let body = ProxyBody::new(target, upstream.bytes_stream().boxed());

        match builder.body(Body::from_stream(body)) {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to build download response: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorEnvelope::internal(
                        "Failed to download file",
                        e.to_string(),
                    )),
                )
                    .into_response()
            }
        }
    }
}

/// Upstream byte stream handed to the response body. Dropping it before the
/// end (client went away) drops the upstream response, which closes that
/// connection.
pub struct ProxyBody {
    inner: BoxStream<'static, Result<Bytes, reqwest::Error>>,
    target: String,
    bytes_sent: u64,
    finished: bool,
}

impl ProxyBody {
    pub fn new(target: String, inner: BoxStream<'static, Result<Bytes, reqwest::Error>>) -> Self {
        Self {
            inner,
            target,
            bytes_sent: 0,
            finished: false,
        }
    }
}

impl Stream for ProxyBody {
    type Item = Result<Bytes, ProxyStreamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        match this.inner.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.bytes_sent += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(source))) => {
                this.finished = true;
                let err = ProxyStreamError::Upstream {
                    target: this.target.clone(),
                    bytes_sent: this.bytes_sent,
                    source,
                };
                error!("{}", err);
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(None) => {
                this.finished = true;
                debug!(
                    "Download from {} complete ({} bytes)",
                    this.target, this.bytes_sent
                );
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for ProxyBody {
    fn drop(&mut self) {
        if !self.finished {
            info!(
                "Client left download from {} after {} bytes, aborting upstream",
                self.target, self.bytes_sent
            );
        }
    }
}
