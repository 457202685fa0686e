use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;
use url::Url;

use readpane::config::Config;
use readpane::gateway::ArticleGateway;
use readpane::model::FilterStatus;
use readpane::sync::{Coordinator, FetchEvent};
use readpane::ui;

/// Get the config directory path (~/.config/readpane/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("readpane"))
}

#[derive(Parser, Debug)]
#[command(name = "readpane", about = "Terminal reading client for a syndicated-article service")]
struct Args {
    /// Base URL of the articles resource (overrides the config file)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Filter to show at startup: unread, all, read, or starred
    #[arg(long, value_name = "FILTER")]
    filter: Option<FilterStatus>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_path = get_config_dir()?.join("config.toml");
    let config = Config::load(&config_path).context("Failed to load configuration")?;

    let api_url = args.api_url.unwrap_or(config.api_url);
    let base_url = Url::parse(&api_url)
        .with_context(|| format!("Invalid API base URL '{}'", api_url))?;

    let initial_filter = match args.filter {
        Some(filter) => filter,
        None => config
            .default_filter
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("Invalid default_filter in config")?,
    };

    // One pooled client for both queries; the per-request timeout bounds
    // how long a lane can stay pending on a hung server.
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(std::time::Duration::from_secs(30))
        .tcp_keepalive(std::time::Duration::from_secs(60))
        .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;
    let gateway = ArticleGateway::new(client, base_url);

    // Channel for fetch completions; the UI loop owns the receiver and is
    // the only place state is mutated.
    let (event_tx, event_rx) = mpsc::channel::<FetchEvent>(32);
    let mut coordinator = Coordinator::new(gateway, initial_filter, event_tx);
    coordinator.refresh();

    ui::run(&mut coordinator, event_rx).await?;

    Ok(())
}
