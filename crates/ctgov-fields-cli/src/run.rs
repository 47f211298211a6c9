//! Fetch, extract, and print one record.

use std::io::Write;

use anyhow::{Context, Result};

use ctgov_fields::{fetch_trial_fields_with, write_report, TrialError, TrialFetcher};

use crate::args::Cli;

/// Run the command, writing the report to `out`.
///
/// Nothing is written unless fetch and extraction both succeed.
pub async fn run<W: Write>(cli: &Cli, out: W) -> Result<()> {
    let identifier = cli.trial_identifier().map_err(TrialError::from)?;
    let config = cli.fetch_config().map_err(TrialError::from)?;
    tracing::debug!(
        %identifier,
        base_url = %config.base_url,
        timeout_ms = config.timeout_ms,
        "resolved settings"
    );

    let fetcher = TrialFetcher::new(config).map_err(TrialError::from)?;
    let bucket = fetch_trial_fields_with(&fetcher, &identifier).await?;

    write_report(&bucket, out).context("failed to write report")?;
    Ok(())
}
