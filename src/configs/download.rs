use serde::{Deserialize, Serialize};

/// Download proxy settings. The allow-list is the only thing keeping the
/// proxy from relaying arbitrary URLs.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DownloadConfig {
    /// Exact origins (`scheme://host[:port]`) the proxy may fetch from.
    pub allowed_origins: Vec<String>,
    pub filename: String,
    pub user_agent: String,
    pub referer: String,
    pub origin: String,
    pub connect_timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "https://bcdnw.hakunaymatata.com".into(),
                "https://valiw.hakunaymatata.com".into(),
            ],
            filename: "movie.mp4".into(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".into(),
            referer: "https://fmoviesunblocked.net/".into(),
            origin: "https://fmoviesunblocked.net".into(),
            connect_timeout_secs: 10,
        }
    }
}

impl DownloadConfig {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}
