use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use yquotes_lib::{
    run_sync, tickers, Archiver, ChartClient, FailurePolicy, LocalStore, SyncOptions, ZipArchiver,
};

#[derive(Parser)]
#[command(name = "yquotes")]
#[command(about = "Sync daily ASX quote datasets from Yahoo Finance")]
struct Cli {
    /// Directory holding per-ticker JSON datasets
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Ticker list file (JSON array or object of symbols)
    #[arg(long, default_value = "yticker.json")]
    tickers: PathBuf,

    /// Rebuild <data-dir>/all.zip from the current per-ticker files
    #[arg(long)]
    archive: bool,

    /// Fetch failure policy: mark (write error marker, continue) or abort
    #[arg(long, default_value = "mark")]
    on_fetch_error: String,

    /// Delay between requests in milliseconds
    #[arg(long, default_value = "1000")]
    delay_ms: u64,

    /// Overall run deadline in seconds
    #[arg(long, default_value = "3600")]
    deadline_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("yquotes=info".parse().unwrap())
                .add_directive("yquotes_lib=info".parse().unwrap())
                .add_directive("yquotes_api=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let failure_policy = match cli.on_fetch_error.as_str() {
        "abort" => FailurePolicy::AbortRun,
        "mark" => FailurePolicy::MarkAndContinue,
        other => return Err(anyhow!("unknown fetch-error policy: {}", other)),
    };

    let ticker_list = tickers::load_tickers(&cli.tickers)?;

    let fetcher = match std::env::var("YQUOTES_BASE_URL").ok() {
        Some(url) => ChartClient::with_base_url(&url)?,
        None => ChartClient::new()?,
    };

    let mut store = LocalStore::open(&cli.data_dir)?;

    let mut archiver = if cli.archive {
        Some(ZipArchiver::create(&cli.data_dir.join("all.zip"))?)
    } else {
        None
    };

    let options = SyncOptions {
        today: chrono::Utc::now().date_naive(),
        pacing: Duration::from_millis(cli.delay_ms),
        failure_policy,
    };

    let report = tokio::time::timeout(
        Duration::from_secs(cli.deadline_secs),
        run_sync(
            &ticker_list,
            &fetcher,
            &mut store,
            archiver.as_mut().map(|a| a as &mut dyn Archiver),
            &options,
        ),
    )
    .await
    .map_err(|_| anyhow!("run exceeded the {}s deadline", cli.deadline_secs))??;

    if let Some(archiver) = archiver {
        archiver.finish()?;
    }

    eprintln!(
        "Sync complete: {} synced, {} skipped, {} delisted, {} failed",
        report.synced, report.skipped, report.delisted, report.failed
    );
    Ok(())
}
