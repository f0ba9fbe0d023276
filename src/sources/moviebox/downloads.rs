use reqwest::header::{HeaderValue, ORIGIN, REFERER};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::{
    DOWNLOAD_PATH, DispatchOptions, MovieBoxSource, headers::geolocation_headers,
    metadata::detail_path,
};
use crate::{
    common::{GatewayError, GatewayResult},
    protocol::SourceRecord,
};

/// Route the gateway serves proxied downloads from.
pub const DOWNLOAD_ROUTE: &str = "/api/download/";

impl MovieBoxSource {
    /// Download links for a movie (`season = episode = 0`) or an episode.
    ///
    /// The download endpoint only answers when the referer looks like the
    /// subject's player page, so the detail lookup runs first to learn the
    /// page slug. `gateway_base` is `scheme://host` of the inbound request and
    /// prefixes every emitted `proxyUrl`.
    pub async fn download_sources(
        &self,
        subject_id: &str,
        season: &str,
        episode: &str,
        gateway_base: &str,
    ) -> GatewayResult<Value> {
        let detail = self.detail(subject_id).await?;
        let Some(slug) = detail_path(&detail) else {
            warn!("Subject {} has no detailPath, cannot build referer", subject_id);
            return Err(GatewayError::MissingPrecondition(format!(
                "Could not determine detailPath for subject {}; unable to build the player referer",
                subject_id
            )));
        };

        let player = &self.config.player;
        let referer = player.referer_for(slug, subject_id);
        debug!("Fetching downloads for {} with referer {}", subject_id, referer);

        let mut headers = geolocation_headers(&self.config)?;
        headers.insert(REFERER, HeaderValue::from_str(&referer)?);
        headers.insert(ORIGIN, HeaderValue::from_str(&player.origin)?);

        let options = DispatchOptions::get()
            .query("subjectId", subject_id)
            .query("se", season)
            .query("ep", episode)
            .headers(headers);
        let payload = self.fetch(DOWNLOAD_PATH, options).await?;

        Ok(attach_processed_sources(payload, gateway_base))
    }
}

pub fn proxy_url_for(gateway_base: &str, direct_url: &str) -> String {
    format!(
        "{}{}{}",
        gateway_base.trim_end_matches('/'),
        DOWNLOAD_ROUTE,
        urlencoding::encode(direct_url)
    )
}

fn quality_of(file: &Value) -> String {
    let resolution = match file.get("resolution") {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    };
    match resolution.as_str() {
        "" | "0" => "Unknown".to_string(),
        r if r.ends_with('p') => r.to_string(),
        r => format!("{}p", r),
    }
}

fn format_of(file: &Value) -> String {
    ["format", "ext"]
        .iter()
        .find_map(|key| file.get(key).and_then(Value::as_str))
        .filter(|f| !f.is_empty())
        .map(|f| f.trim_start_matches('.').to_ascii_lowercase())
        .unwrap_or_else(|| "mp4".to_string())
}

/// One record per `downloads[]` entry that has a URL.
pub fn source_records(payload: &Value, gateway_base: &str) -> Vec<SourceRecord> {
    let Some(files) = payload.get("downloads").and_then(Value::as_array) else {
        return Vec::new();
    };

    files
        .iter()
        .filter_map(|file| {
            let direct_url = file.get("url").and_then(Value::as_str)?;
            Some(SourceRecord {
                id: file.get("id").cloned().unwrap_or(Value::Null),
                quality: quality_of(file),
                direct_url: direct_url.to_string(),
                proxy_url: proxy_url_for(gateway_base, direct_url),
                size: file.get("size").cloned().unwrap_or(Value::Null),
                format: format_of(file),
            })
        })
        .collect()
}

/// Adds `processedSources` next to the upstream fields (`downloads`,
/// `captions`, ...), which pass through unchanged.
pub fn attach_processed_sources(payload: Value, gateway_base: &str) -> Value {
    let records = source_records(&payload, gateway_base);
    match payload {
        Value::Object(mut obj) => {
            obj.insert("processedSources".into(), json!(records));
            Value::Object(obj)
        }
        other => json!({ "downloads": other, "processedSources": records }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn download_payload() -> Value {
        json!({
            "downloads": [
                { "id": "d1", "url": "https://bcdnw.hakunaymatata.com/a/b.mp4?sign=x&t=1", "resolution": 1080, "size": "1932735283" },
                { "id": "d2", "url": "https://valiw.hakunaymatata.com/c.mkv", "resolution": "480p", "size": "400", "format": "MKV" },
                { "id": "d3", "resolution": 360 }
            ],
            "captions": [ { "lan": "en", "url": "https://cc/en.srt" } ],
            "hasResource": true
        })
    }

    #[test]
    fn proxy_url_is_percent_encoded_under_gateway() {
        assert_eq!(
            proxy_url_for("http://localhost:5000/", "https://bcdnw.hakunaymatata.com/x.mp4?a=1&b=2"),
            "http://localhost:5000/api/download/https%3A%2F%2Fbcdnw.hakunaymatata.com%2Fx.mp4%3Fa%3D1%26b%3D2"
        );
    }

    #[test]
    fn records_skip_entries_without_url() {
        let records = source_records(&download_payload(), "https://gw.example");
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].id, json!("d1"));
        assert_eq!(records[0].quality, "1080p");
        assert_eq!(records[0].format, "mp4");
        assert_eq!(records[0].size, json!("1932735283"));
        assert!(records[0].proxy_url.starts_with("https://gw.example/api/download/https%3A%2F%2F"));

        assert_eq!(records[1].quality, "480p");
        assert_eq!(records[1].format, "mkv");
    }

    #[test]
    fn missing_resolution_is_unknown() {
        assert_eq!(quality_of(&json!({})), "Unknown");
        assert_eq!(quality_of(&json!({ "resolution": 0 })), "Unknown");
        assert_eq!(quality_of(&json!({ "resolution": "720" })), "720p");
    }

    #[test]
    fn upstream_fields_pass_through() {
        let shaped = attach_processed_sources(download_payload(), "http://gw");
        assert_eq!(shaped["captions"][0]["lan"], "en");
        assert_eq!(shaped["downloads"].as_array().unwrap().len(), 3);
        assert_eq!(shaped["processedSources"].as_array().unwrap().len(), 2);
        assert_eq!(
            shaped["processedSources"][0]["directUrl"],
            "https://bcdnw.hakunaymatata.com/a/b.mp4?sign=x&t=1"
        );
    }

    #[test]
    fn empty_payload_yields_no_sources() {
        let shaped = attach_processed_sources(json!({ "downloads": null }), "http://gw");
        assert_eq!(shaped["processedSources"], json!([]));
    }
}
