use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use social_post_scraper::api::{EnsembleClient, FetchRequest};
use social_post_scraper::config::Config;
use social_post_scraper::db::Database;
use social_post_scraper::platform::Platform;
use social_post_scraper::scrape::scrape;

#[derive(Parser, Debug)]
#[command(
    name = "social-post-scraper",
    version,
    about = "Scrape TikTok, Instagram or Threads posts into a local database"
)]
struct Cli {
    /// Platform to scrape: tiktok, instagram or threads
    #[arg(long, default_value = "tiktok")]
    platform: String,
    /// Hashtag (TikTok, Instagram) or keyword (Threads) to search for
    #[arg(long, default_value = "blackjoy")]
    hashtag: String,
    /// TikTok only: how many days back to search
    #[arg(long, default_value_t = 100_000)]
    days: i64,
    /// TikTok cursor limit; Instagram chunk size
    #[arg(long = "max_cursor", default_value_t = 10_000)]
    max_cursor: i64,
    /// EnsembleData API token (defaults to ENSEMBLE_TOKEN)
    #[arg(long)]
    token: Option<String>,
    /// Database file (defaults to DATABASE_PATH or the home-relative path)
    #[arg(long)]
    database: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let cli = Cli::parse();
    println!(
        "Scraping {} with hashtag {} and adding to database . . .",
        cli.platform, cli.hashtag
    );

    let Some(platform) = Platform::from_name(&cli.platform) else {
        warn!(platform = %cli.platform, "Unsupported platform, nothing to do");
        return Ok(());
    };

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(token) = cli.token {
        config.api_token = Some(token);
    }
    if let Some(path) = cli.database {
        config.database_path = path;
    }
    config.validate().context("Invalid configuration")?;
    let token = config.require_token()?;

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create database directory: {}", parent.display())
        })?;
    }

    let db = Database::new(&config.database_path)
        .await
        .context("Failed to initialize database")?;
    let client = EnsembleClient::new(&config, token)?;

    let request = FetchRequest {
        platform,
        hashtag: cli.hashtag,
        days: cli.days,
        max_cursor: cli.max_cursor,
    };
    let summary = scrape(&db, &client, &request).await?;

    info!(
        inserted = summary.inserted,
        duplicates = summary.duplicates,
        rejected = summary.rejected,
        "Scrape complete"
    );
    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,social_post_scraper=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
