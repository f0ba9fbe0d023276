use serde::{Deserialize, Serialize};

use crate::{common::types::AnyResult, configs::*};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    pub logging: Option<LoggingConfig>,
}

impl Config {
    pub fn load() -> AnyResult<Self> {
        let config_path = if std::path::Path::new("config.toml").exists() {
            Some("config.toml")
        } else if std::path::Path::new("config.default.toml").exists() {
            Some("config.default.toml")
        } else {
            None
        };

        let mut config = match config_path {
            Some(path) => {
                crate::log_println!("Loading configuration from: {}", path);
                let config_str = std::fs::read_to_string(path)?;
                Self::parse(&config_str)?
            }
            None => {
                crate::log_println!("No config.toml found, using built-in defaults");
                Config::default()
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn parse(config_str: &str) -> AnyResult<Self> {
        Ok(toml::from_str(config_str)?)
    }

    /// `MOVIEBOX_API_HOST` selects the upstream host, `PORT` the listen port.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> AnyResult<()> {
        if let Some(host) = lookup("MOVIEBOX_API_HOST").filter(|h| !h.trim().is_empty()) {
            self.upstream.host = host.trim().to_string();
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| format!("invalid PORT '{}': {}", port, e))?;
        }
        Ok(())
    }
}
