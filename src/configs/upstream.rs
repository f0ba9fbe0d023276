use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "h5.aoneroom.com";

/// Hosts known to serve the same catalog API.
pub const KNOWN_MIRRORS: &[&str] = &[
    "h5.aoneroom.com",
    "movieboxapp.in",
    "moviebox.pk",
    "moviebox.ph",
    "moviebox.id",
    "v.moviebox.ph",
    "netnaija.video",
];

/// Connection and impersonation settings for the catalog backend.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Selected host; the header profile is derived from it.
    pub host: String,
    pub mirrors: Vec<String>,
    /// Base URL override, mostly for pointing tests at a local server.
    /// Defaults to `https://{host}`.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Anonymous user id sent with trending requests.
    pub anonymous_uid: String,
    pub timezone: String,
    /// Address placed in the forwarded-for family of headers.
    pub forged_ip: String,
    pub country: String,
    pub player: PlayerConfig,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            mirrors: KNOWN_MIRRORS.iter().map(|m| m.to_string()).collect(),
            base_url: None,
            timeout_secs: 30,
            connect_timeout_secs: 10,
            anonymous_uid: "5591179548772780352".into(),
            timezone: "Africa/Nairobi".into(),
            forged_ip: "1.1.1.1".into(),
            country: "US".into(),
            player: PlayerConfig::default(),
        }
    }
}

impl UpstreamConfig {
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.host),
        }
    }

    pub fn is_known_host(&self) -> bool {
        self.mirrors.iter().any(|m| m.eq_ignore_ascii_case(&self.host))
    }
}

/// Front-end player page the download-links endpoint expects as referer.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PlayerConfig {
    pub origin: String,
    pub page_path: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            origin: "https://fmoviesunblocked.net".into(),
            page_path: "/spa/videoPlayPage/movies/".into(),
        }
    }
}

impl PlayerConfig {
    pub fn referer_for(&self, detail_path: &str, subject_id: &str) -> String {
        format!(
            "{}{}{}?id={}&type=/movie/detail",
            self.origin, self.page_path, detail_path, subject_id
        )
    }
}
