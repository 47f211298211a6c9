//! ctgov-fields — entry point.

use clap::Parser;

use ctgov_fields_cli::{run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // 0 = success, 1 = fetch, parse, config or output failure
    if let Err(e) = run(&cli, std::io::stdout().lock()).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
