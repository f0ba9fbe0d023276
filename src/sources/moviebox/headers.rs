use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HOST, HeaderMap, HeaderName, HeaderValue,
    InvalidHeaderValue, REFERER, USER_AGENT,
};

use crate::configs::UpstreamConfig;

pub const MOBILE_USER_AGENT: &str = "okhttp/4.12.0";

const X_CLIENT_INFO: HeaderName = HeaderName::from_static("x-client-info");
const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
const CF_CONNECTING_IP: HeaderName = HeaderName::from_static("cf-connecting-ip");
const X_REAL_IP: HeaderName = HeaderName::from_static("x-real-ip");
const CF_IPCOUNTRY: HeaderName = HeaderName::from_static("cf-ipcountry");

/// Headers impersonating the Android app's HTTP stack, bound to one upstream
/// host. Built once from config and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct HeaderProfile {
    host: String,
    headers: HeaderMap,
}

impl HeaderProfile {
    pub fn for_upstream(config: &UpstreamConfig) -> Result<Self, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();
        let client_info = serde_json::json!({ "timezone": config.timezone }).to_string();

        headers.insert(X_CLIENT_INFO, HeaderValue::from_str(&client_info)?);
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(MOBILE_USER_AGENT));
        headers.insert(
            REFERER,
            HeaderValue::from_str(&format!("https://{}", config.host))?,
        );
        headers.insert(HOST, HeaderValue::from_str(&config.host)?);
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.extend(forwarded_for(&config.forged_ip)?);

        Ok(Self {
            host: config.host.clone(),
            headers,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

fn forwarded_for(ip: &str) -> Result<HeaderMap, InvalidHeaderValue> {
    let value = HeaderValue::from_str(ip)?;
    let mut headers = HeaderMap::new();
    headers.insert(X_FORWARDED_FOR, value.clone());
    headers.insert(CF_CONNECTING_IP, value.clone());
    headers.insert(X_REAL_IP, value);
    Ok(headers)
}

/// Forged client address plus country, sent with download-link lookups.
pub fn geolocation_headers(config: &UpstreamConfig) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = forwarded_for(&config.forged_ip)?;
    headers.insert(CF_IPCOUNTRY, HeaderValue::from_str(&config.country)?);
    Ok(headers)
}

/// Merges header layers with increasing precedence:
/// profile defaults < session-derived < per-call overrides.
///
/// A name present in a higher layer replaces every value the lower layers
/// set for it; it is never appended alongside them.
pub struct HeaderLayers<'a> {
    defaults: &'a HeaderMap,
    session: HeaderMap,
    overrides: HeaderMap,
}

impl<'a> HeaderLayers<'a> {
    pub fn new(defaults: &'a HeaderMap) -> Self {
        Self {
            defaults,
            session: HeaderMap::new(),
            overrides: HeaderMap::new(),
        }
    }

    pub fn session(mut self, headers: HeaderMap) -> Self {
        self.session = headers;
        self
    }

    pub fn overrides(mut self, headers: HeaderMap) -> Self {
        self.overrides = headers;
        self
    }

    pub fn build(self) -> HeaderMap {
        let mut merged = self.defaults.clone();
        for layer in [self.session, self.overrides] {
            for name in layer.keys() {
                merged.remove(name);
            }
            for (name, value) in layer.iter() {
                merged.append(name.clone(), value.clone());
            }
        }
        merged
    }
}
