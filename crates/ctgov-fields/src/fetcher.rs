//! HTTP retrieval of a single trial record.
//!
//! One GET per call, bounded by the configured timeout. Any non-2xx final
//! status is a [`FetchError::Status`]; nothing is retried.

use std::time::Duration;

use url::Url;

use crate::config::FetchConfig;
use crate::types::{ConfigError, FetchError, TrialIdentifier, TrialResult};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("ctgov-fields/", env!("CARGO_PKG_VERSION"));

/// Query that makes the registry answer with the XML rendition of a record.
pub const XML_QUERY: &str = "displayxml=true";

const MAX_REDIRECTS: usize = 5;

/// Build the record URL: `<base><identifier>?displayxml=true`.
///
/// The identifier becomes one percent-encoded path segment. A base that
/// cannot carry path segments (`mailto:`, `data:`) is rejected.
pub fn trial_url(base: &Url, identifier: &TrialIdentifier) -> Result<Url, ConfigError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ConfigError::InvalidBaseUrl {
            value: base.to_string(),
            message: "URL cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .push(identifier.as_str());
    url.set_query(Some(XML_QUERY));
    url.set_fragment(None);
    Ok(url)
}

/// Fetches raw record XML from the registry.
#[derive(Debug, Clone)]
pub struct TrialFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl TrialFetcher {
    /// Create a fetcher with its own HTTP client.
    pub fn new(config: FetchConfig) -> Result<Self, ConfigError> {
        if config.base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                value: config.base_url.to_string(),
                message: "URL cannot be a base".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(ConfigError::Client)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// URL this fetcher requests for `identifier`.
    pub fn url_for(&self, identifier: &TrialIdentifier) -> Result<Url, ConfigError> {
        trial_url(&self.config.base_url, identifier)
    }

    /// Perform the GET and return the body text.
    ///
    /// Transport, timeout and status failures are [`TrialError::Fetch`](crate::TrialError::Fetch).
    pub async fn fetch(&self, identifier: &TrialIdentifier) -> TrialResult<String> {
        let url = self.url_for(identifier)?;
        tracing::debug!(%url, "fetching trial record");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.request_error(identifier, e))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "registry returned an error status");
            return Err(FetchError::Status {
                identifier: identifier.to_string(),
                status: status.as_u16(),
                url: resp.url().to_string(),
            }
            .into());
        }

        let body = resp
            .text()
            .await
            .map_err(|e| self.request_error(identifier, e))?;

        tracing::debug!(
            %url,
            status = status.as_u16(),
            bytes = body.len(),
            "trial record fetched"
        );
        Ok(body)
    }

    fn request_error(&self, identifier: &TrialIdentifier, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                identifier: identifier.to_string(),
                timeout_ms: self.config.timeout_ms,
            }
        } else {
            FetchError::Request {
                identifier: identifier.to_string(),
                source: err,
            }
        }
    }
}
