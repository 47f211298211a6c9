//! Fetch settings and their resolution from explicit values or the environment.

use url::Url;

use crate::types::ConfigError;

/// Registry endpoint records are served under.
pub const DEFAULT_BASE_URL: &str = "https://clinicaltrials.gov/ct2/show/";

/// Request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 20_000;

/// Environment variable overriding the registry base URL.
pub const BASE_URL_ENV: &str = "CTGOV_BASE_URL";

/// Environment variable overriding the request timeout.
pub const TIMEOUT_ENV: &str = "CTGOV_TIMEOUT_MS";

/// Settings for a [`TrialFetcher`](crate::fetcher::TrialFetcher).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Directory-style URL the identifier is appended to.
    pub base_url: Url,
    pub timeout_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl FetchConfig {
    /// Resolve each setting: explicit value, then environment, then default.
    pub fn resolve(base_url: Option<&str>, timeout_ms: Option<u64>) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: resolve_base_url(base_url)?,
            timeout_ms: resolve_timeout_ms(timeout_ms)?,
        })
    }

    /// Settings from the environment alone.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(None, None)
    }
}

/// Resolve the registry base URL.
pub fn resolve_base_url(explicit: Option<&str>) -> Result<Url, ConfigError> {
    if let Some(raw) = explicit {
        return parse_base_url(raw);
    }

    if let Ok(env_url) = std::env::var(BASE_URL_ENV) {
        if !env_url.trim().is_empty() {
            return parse_base_url(&env_url);
        }
    }

    parse_base_url(DEFAULT_BASE_URL)
}

/// Resolve the request timeout in milliseconds.
pub fn resolve_timeout_ms(explicit: Option<u64>) -> Result<u64, ConfigError> {
    if let Some(ms) = explicit {
        return validate_timeout(ms, || ms.to_string());
    }

    if let Ok(env_ms) = std::env::var(TIMEOUT_ENV) {
        let trimmed = env_ms.trim();
        if !trimmed.is_empty() {
            let ms = trimmed
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(env_ms.clone()))?;
            return validate_timeout(ms, || env_ms.clone());
        }
    }

    Ok(DEFAULT_TIMEOUT_MS)
}

fn validate_timeout(ms: u64, raw: impl FnOnce() -> String) -> Result<u64, ConfigError> {
    if ms == 0 {
        return Err(ConfigError::InvalidTimeout(raw()));
    }
    Ok(ms)
}

/// Parse a base URL, forcing a trailing slash so the identifier lands
/// beneath the configured path instead of replacing its last segment.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
        message,
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be a base".to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
