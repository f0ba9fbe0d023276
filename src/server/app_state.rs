use std::sync::Arc;

use crate::{configs::Config, sources::moviebox::MovieBoxSource, transport::DownloadProxy};

/// Top-level application state, shared by every route.
pub struct AppState {
    pub moviebox: Arc<MovieBoxSource>,
    pub downloads: Arc<DownloadProxy>,
}

impl AppState {
    /// Consumes the configuration; each service keeps the section it needs.
    pub fn new(config: Config) -> Result<Self, String> {
        let moviebox = MovieBoxSource::new(config.upstream)?;
        let downloads = DownloadProxy::new(config.download)?;
        Ok(Self {
            moviebox: Arc::new(moviebox),
            downloads: Arc::new(downloads),
        })
    }
}
