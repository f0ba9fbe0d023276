use std::time::Duration;

use reqwest::{Client, Error};

use crate::configs::{DownloadConfig, UpstreamConfig};

pub struct HttpClient;

impl HttpClient {
    /// Client for catalog calls. Headers come from the profile on every
    /// request, and cookies are attached explicitly, so neither is set here.
    pub fn api(config: &UpstreamConfig) -> Result<Client, Error> {
        Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .deflate(true)
            .build()
    }

    /// Client for the download proxy. Only the connect phase is bounded and
    /// bodies are relayed without transparent decompression.
    pub fn streaming(config: &DownloadConfig) -> Result<Client, Error> {
        Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .gzip(false)
            .deflate(false)
            .build()
    }
}
