//! Command-line arguments.

use clap::Parser;

use ctgov_fields::{ConfigError, FetchConfig, TrialIdentifier};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "ctgov-fields",
    about = "Fetch a ClinicalTrials.gov record and print its name and location fields",
    version
)]
pub struct Cli {
    /// Trial identifier (NCT number), e.g. NCT01592370.
    pub identifier: String,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Request timeout in milliseconds [env: CTGOV_TIMEOUT_MS, default: 20000].
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Registry URL the identifier is appended to [env: CTGOV_BASE_URL].
    #[arg(long)]
    pub base_url: Option<String>,
}

impl Cli {
    /// Fetch settings: flags, then environment, then defaults.
    pub fn fetch_config(&self) -> Result<FetchConfig, ConfigError> {
        FetchConfig::resolve(self.base_url.as_deref(), self.timeout_ms)
    }

    pub fn trial_identifier(&self) -> Result<TrialIdentifier, ConfigError> {
        TrialIdentifier::new(&self.identifier)
    }
}
