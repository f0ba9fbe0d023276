use std::sync::Arc;

use reqwest::{
    Method, Response,
    cookie::Jar,
    header::{COOKIE, HeaderMap},
};
use serde_json::Value;
use tracing::{debug, error};

use super::{BOOTSTRAP_PATH, MovieBoxSource, headers::HeaderLayers, helpers, session};
use crate::common::{GatewayError, GatewayResult};

/// Per-call request description for [`MovieBoxSource::dispatch`].
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    method: Method,
    query: Vec<(String, String)>,
    body: Option<Value>,
    headers: HeaderMap,
    with_session_cookies: bool,
}

impl DispatchOptions {
    /// A GET that carries the session cookies.
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
            with_session_cookies: true,
        }
    }

    pub fn post_json(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::get()
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Highest-precedence headers for this call.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn without_session_cookies(mut self) -> Self {
        self.with_session_cookies = false;
        self
    }
}

impl MovieBoxSource {
    pub async fn ensure_ready(&self) -> GatewayResult<()> {
        self.session
            .ensure_ready(false, |jar| self.bootstrap(jar))
            .await
    }

    /// Drops the current session and bootstraps a new one.
    pub async fn reset_session(&self) -> GatewayResult<()> {
        self.session.ensure_ready(true, |jar| self.bootstrap(jar)).await
    }

    async fn bootstrap(&self, jar: Arc<Jar>) -> GatewayResult<Value> {
        let url = self.endpoint(BOOTSTRAP_PATH)?;
        debug!("Bootstrapping upstream session via {}", url);

        let response = self
            .client
            .get(url.clone())
            .headers(self.profile.headers().clone())
            .query(&[("app_name", "moviebox")])
            .send()
            .await
            .inspect_err(|e| error!("Session bootstrap request to {} failed: {}", url, e))?;

        session::store_into(&jar, response.headers(), &url);
        read_json(response).await
    }

    /// Sends one request to the catalog after making sure the session is
    /// ready. Headers are layered profile < session < `options.headers`.
    /// Failures are logged and returned as-is; nothing is retried.
    pub async fn dispatch(&self, path: &str, options: DispatchOptions) -> GatewayResult<Value> {
        self.ensure_ready().await?;

        let url = self.endpoint(path)?;
        let mut session_headers = HeaderMap::new();
        if options.with_session_cookies {
            if let Some(cookie) = self.session.cookie_header(&url) {
                session_headers.insert(COOKIE, cookie);
            }
        }

        let headers = HeaderLayers::new(self.profile.headers())
            .session(session_headers)
            .overrides(options.headers)
            .build();

        let mut request = self
            .client
            .request(options.method.clone(), url.clone())
            .headers(headers);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        debug!(
            "{} {} (cookies: {})",
            options.method, url, options.with_session_cookies
        );
        let response = request
            .send()
            .await
            .inspect_err(|e| error!("{} {} failed: {}", options.method, url, e))?;

        if options.with_session_cookies {
            self.session.store_cookies(response.headers(), &url);
        }

        read_json(response).await
    }

    /// [`Self::dispatch`] followed by the envelope unwrap.
    pub async fn fetch(&self, path: &str, options: DispatchOptions) -> GatewayResult<Value> {
        self.dispatch(path, options)
            .await
            .map(super::envelope::unwrap_payload)
    }
}

async fn read_json(response: Response) -> GatewayResult<Value> {
    let status = response.status();
    let url = response.url().clone();

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        error!("Upstream {} responded {}: {}", url, status, helpers::truncate(&text, 300));

        let message = if text.trim().is_empty() {
            status.canonical_reason().unwrap_or("Unknown").to_string()
        } else {
            helpers::truncate(&text, 300)
        };
        return Err(GatewayError::Upstream {
            status: status.as_u16(),
            message,
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        error!("Upstream {} returned invalid JSON: {}", url, e);
        GatewayError::Decode(e.to_string())
    })
}
