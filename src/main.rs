//! Usage:
//!   cargo run                      # Fresh download, then build both dictionaries
//!   cargo run -- --use-cache       # Reuse files already in DOWNLOAD_DIR (`--useCache` also works)
//!
//! Optional environment variables:
//! - MANIFEST_URL, RESOURCES_URL
//! - DOWNLOAD_DIR (defaults to download), OUTPUT_DIR (defaults to output)
//! - MIN_VERSION (defaults to 1.6.1), TARGET_LOCALE (defaults to zh_cn)
//! - MAX_CONCURRENT_DOWNLOADS (defaults to 8), HTTP_TIMEOUT_SECS (defaults to 60)

use anyhow::Result;
use mc_lang_dict::{
    config::{use_cache_requested, Config},
    pipeline,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mc_lang_dict=info".parse()?),
        )
        .init();

    let use_cache = use_cache_requested(std::env::args());

    info!("Starting dictionary build (use cache: {})", use_cache);

    let config = Config::from_env()?;
    let dictionaries = pipeline::run(&config, use_cache).await?;

    info!(
        "Done: {} terms, {} keys",
        dictionaries.by_term.len(),
        dictionaries.by_key.len()
    );
    Ok(())
}
