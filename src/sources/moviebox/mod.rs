pub mod catalog;
pub mod dispatch;
pub mod downloads;
pub mod envelope;
pub mod headers;
pub mod helpers;
pub mod metadata;
pub mod search;
pub mod session;

use reqwest::Url;
use tracing::{info, warn};

use crate::{common::HttpClient, configs::UpstreamConfig};

pub use dispatch::DispatchOptions;
pub use envelope::{Envelope, unwrap_payload};
pub use headers::{HeaderLayers, HeaderProfile};
pub use session::{SessionStatus, SessionStore};

const BOOTSTRAP_PATH: &str = "/wefeed-h5-bff/app/get-latest-app-pkgs";
const HOME_PATH: &str = "/wefeed-h5-bff/web/home";
const TRENDING_PATH: &str = "/wefeed-h5-bff/web/subject/trending";
const SEARCH_PATH: &str = "/wefeed-h5-bff/web/subject/search";
const DETAIL_PATH: &str = "/wefeed-h5-bff/web/subject/detail";
const DOWNLOAD_PATH: &str = "/wefeed-h5-bff/web/subject/download";

/// Client for the MovieBox catalog API: owns the header profile, the shared
/// session and the HTTP client every resolver goes through.
pub struct MovieBoxSource {
    client: reqwest::Client,
    config: UpstreamConfig,
    base_url: Url,
    profile: HeaderProfile,
    session: SessionStore,
}

impl MovieBoxSource {
    pub fn new(config: UpstreamConfig) -> Result<Self, String> {
        if !config.is_known_host() {
            warn!(
                "Upstream host '{}' is not a known mirror, using it anyway",
                config.host
            );
        }

        let base_url = Url::parse(&config.base_url()).map_err(|e| e.to_string())?;
        let profile = HeaderProfile::for_upstream(&config).map_err(|e| e.to_string())?;
        let client = HttpClient::api(&config).map_err(|e| e.to_string())?;

        info!("MovieBox upstream: {} ({})", profile.host(), base_url);

        Ok(Self {
            client,
            config,
            base_url,
            profile,
            session: SessionStore::new(),
        })
    }

    pub fn host(&self) -> &str {
        self.profile.host()
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}
