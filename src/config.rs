use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CATALOG_URL: &str = "https://ark0f.github.io/tg-bot-api/openapi.json";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub bot: BotConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Seconds between background re-fetches; `0` disables refresh.
    #[serde(default)]
    pub refresh_interval_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            refresh_interval_secs: 0,
        }
    }
}

fn default_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    /// Cache lifetime hint sent with every inline answer, in seconds.
    #[serde(default = "default_cache_time")]
    pub cache_time: u32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            cache_time: default_cache_time(),
        }
    }
}

fn default_cache_time() -> u32 {
    1
}

impl CatalogConfig {
    pub fn refresh_enabled(&self) -> bool {
        self.refresh_interval_secs > 0
    }
}

/// Load and validate the configuration file.
///
/// A missing file is not an error: every setting has a default, and the
/// bot token comes from the environment.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!("Config file {} not found, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&content)?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let url = config.catalog.url.trim();
    if url.is_empty() {
        anyhow::bail!("catalog.url must not be empty");
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        anyhow::bail!("catalog.url must be an http(s) URL, got '{}'", url);
    }

    if config.catalog.timeout_secs == 0 {
        anyhow::bail!("catalog.timeout_secs must be > 0");
    }

    Ok(())
}
