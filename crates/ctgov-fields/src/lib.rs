//! ctgov-fields — fetch a ClinicalTrials.gov record and group its location
//! fields (`name`, `country`, `city`, `state`, `zip`) by tag.

pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod reporter;
pub mod types;

pub use config::FetchConfig;
pub use extractor::{extract_fields, FieldExtractor};
pub use fetcher::{trial_url, TrialFetcher};
pub use reporter::{format_line, render, write_report};
pub use types::*;

/// Fetch a record with settings resolved from the environment and extract
/// the default tag set.
pub async fn fetch_trial_fields(identifier: &str) -> TrialResult<FieldBucket> {
    let identifier = TrialIdentifier::new(identifier)?;
    let fetcher = TrialFetcher::new(FetchConfig::from_env()?)?;
    fetch_trial_fields_with(&fetcher, &identifier).await
}

/// Fetch with a caller-supplied fetcher and extract the default tag set.
///
/// Nothing is extracted unless the fetch succeeded.
pub async fn fetch_trial_fields_with(
    fetcher: &TrialFetcher,
    identifier: &TrialIdentifier,
) -> TrialResult<FieldBucket> {
    let xml = fetcher.fetch(identifier).await?;
    let bucket = extract_fields(&xml)?;
    tracing::info!(
        %identifier,
        keys = bucket.len(),
        values = bucket.total_values(),
        "trial fields ready"
    );
    Ok(bucket)
}
