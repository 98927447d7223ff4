//! Mini File Cache - command line host
//!
//! Fetches every path given on the command line through the cache and prints
//! one JSON line per fetch, followed by a shutdown report.

use anyhow::Context;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_file_cache::models::ShutdownReport;
use mini_file_cache::{Config, FileCache};

/// Main entry point for the file cache host.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache in front of the configured root
/// 4. Fetch each argument, printing hits and misses
/// 5. Destroy the cache and print its final statistics
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_file_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, index_hint={}, root={}",
        config.max_entries,
        config.index_hint,
        config.root.display()
    );

    let host = FileCache::from_config(&config).context("failed to create cache")?;

    for path in std::env::args().skip(1) {
        let line = match host.fetch(&path).await {
            Ok(file) => serde_json::to_value(&file).context("failed to encode fetch result")?,
            Err(e) => {
                warn!(path = %path, error = %e, "fetch failed");
                json!({ "path": path, "error": e.to_string() })
            }
        };
        println!("{}", line);
    }

    let stats = host.stats().await;
    let report = ShutdownReport::new(stats, host.shutdown());
    println!(
        "{}",
        serde_json::to_string(&report).context("failed to encode shutdown report")?
    );

    info!("File cache shutdown complete");
    Ok(())
}
