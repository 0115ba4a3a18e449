use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use feedreader::dom::MemoryDocument;
use feedreader::feed::{build_client, HttpFeedSource};
use feedreader::{App, Config};

/// Get the default config file path (~/.config/feedreader/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("feedreader")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(name = "feedreader", about = "Load a feed and print its rendered entries")]
struct Args {
    /// Config file (defaults to ~/.config/feedreader/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Feed index to load instead of the configured initial feed
    #[arg(long, value_name = "N")]
    feed: Option<usize>,

    /// Print the configured feeds and exit
    #[arg(long)]
    list: bool,

    /// With --list, print the feeds as JSON
    #[arg(long, requires = "list")]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let registry = Arc::new(config.registry().context("Invalid feed configuration")?);

    if args.list {
        if args.json {
            let json = serde_json::to_string_pretty(registry.as_slice())
                .context("Failed to serialize feed list")?;
            println!("{}", json);
        } else {
            for (index, feed) in registry.iter().enumerate() {
                println!("{:>3}  {}  {}", index, feed.name, feed.url);
            }
        }
        return Ok(());
    }

    let client = build_client(config.request_timeout()).context("Failed to build HTTP client")?;
    let source = HttpFeedSource::new(client, config.request_timeout())
        .allow_private_hosts(config.allow_private_hosts);

    let app = App::new(registry, source, MemoryDocument::new())
        .with_entry_limit(config.entry_limit());

    let index = args.feed.unwrap_or(config.initial_feed);
    let report = app.init(index).await.context("Failed to load feed")?;

    println!("{}", app.header_title());
    println!("{}", app.feed_html());
    tracing::info!(feed = %report.feed_name, entries = report.entries, "Done");

    Ok(())
}
