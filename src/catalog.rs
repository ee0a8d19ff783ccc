//! Loading and holding the Bot API description.
//!
//! [`fetch_catalog`] downloads and parses the OpenAPI document with
//! bounded retry. [`Catalog`] is the shared handle the bot reads from on
//! every inline query; a refresh builds a complete new description and
//! swaps it in one step, so readers see either the old or the new
//! description, never a mix.
//!
//! # Retry Strategy
//!
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Malformed documents → fail immediately
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::CatalogConfig;
use crate::errors::CatalogError;
use crate::models::ApiDescription;
use crate::openapi::parse_document;

/// Shared, swappable handle to the current description.
#[derive(Clone, Default)]
pub struct Catalog {
    current: Arc<RwLock<Arc<ApiDescription>>>,
}

impl Catalog {
    pub fn new(api: ApiDescription) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(api))),
        }
    }

    /// A catalog with no entries, served until the first fetch succeeds.
    pub fn empty() -> Self {
        Self::new(ApiDescription::empty())
    }

    /// The description as of now. The lock is released before returning.
    pub fn snapshot(&self) -> Arc<ApiDescription> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Replace the whole description.
    pub fn replace(&self, api: ApiDescription) {
        let next = Arc::new(api);
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = next;
    }
}

/// Retry settings for a fetch, derived from [`CatalogConfig`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each attempt.
    pub backoff_base: Duration,
}

impl From<&CatalogConfig> for FetchOptions {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            url: config.url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            max_retries: config.max_retries,
            backoff_base: Duration::from_secs(1),
        }
    }
}

/// Download and parse the OpenAPI document with retry/backoff.
pub async fn fetch_catalog(opts: &FetchOptions) -> Result<ApiDescription, CatalogError> {
    let client = reqwest::Client::builder().timeout(opts.timeout).build()?;

    let mut last_err = None;

    for attempt in 0..=opts.max_retries {
        if attempt > 0 {
            let delay = opts.backoff_base * (1u32 << (attempt - 1).min(5));
            debug!("Retrying catalog fetch in {:?} (attempt {})", delay, attempt + 1);
            tokio::time::sleep(delay).await;
        }

        match fetch_once(&client, &opts.url).await {
            Ok(text) => {
                let api = parse_document(&text)?;
                info!(
                    methods = api.methods.len(),
                    types = api.types.len(),
                    "Fetched Bot API description from {}",
                    opts.url
                );
                return Ok(api);
            }
            Err(e) if e.is_transient() => {
                warn!("Catalog fetch attempt {} failed: {}", attempt + 1, e);
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_err.unwrap_or(CatalogError::Http {
        status: 0,
        body: "no attempts made".to_string(),
    }))
}

async fn fetch_once(client: &reqwest::Client, url: &str) -> Result<String, CatalogError> {
    let response = client.get(url).send().await?;
    let status = response.status();

    if status.is_success() {
        return Ok(response.text().await?);
    }

    let body = response.text().await.unwrap_or_default();
    Err(CatalogError::Http {
        status: status.as_u16(),
        body,
    })
}

/// Read and parse a local copy of the OpenAPI document.
pub fn load_catalog_file(path: &Path) -> Result<ApiDescription, CatalogError> {
    let text = std::fs::read_to_string(path)?;
    let api = parse_document(&text)?;
    info!(
        methods = api.methods.len(),
        types = api.types.len(),
        "Loaded Bot API description from {}",
        path.display()
    );
    Ok(api)
}

/// Periodically re-fetch the description and swap it into `catalog`.
///
/// A failed refresh keeps the current description.
pub fn spawn_refresh(catalog: Catalog, opts: FetchOptions, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // the first tick completes immediately; startup already fetched
        interval.tick().await;
        loop {
            interval.tick().await;
            match fetch_catalog(&opts).await {
                Ok(api) => catalog.replace(api),
                Err(e) => warn!("Catalog refresh failed, keeping previous description: {}", e),
            }
        }
    })
}
