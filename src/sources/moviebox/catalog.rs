use serde_json::Value;

use super::{DispatchOptions, HOME_PATH, MovieBoxSource, TRENDING_PATH};
use crate::common::GatewayResult;

impl MovieBoxSource {
    /// Homepage rows, unreshaped. Fetched without the session cookies.
    pub async fn homepage(&self) -> GatewayResult<Value> {
        self.fetch(HOME_PATH, DispatchOptions::get().without_session_cookies())
            .await
    }

    /// Trending list for the anonymous user.
    pub async fn trending(&self, page: u32, per_page: u32) -> GatewayResult<Value> {
        let options = DispatchOptions::get()
            .query("uid", &self.config.anonymous_uid)
            .query("page", page)
            .query("perPage", per_page);
        self.fetch(TRENDING_PATH, options).await
    }
}
