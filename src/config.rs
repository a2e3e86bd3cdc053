use crate::version::Version;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";
pub const DEFAULT_RESOURCES_URL: &str = "https://resources.download.minecraft.net";

#[derive(Debug, Clone)]
pub struct Config {
    // Remote sources
    pub manifest_url: String,
    pub resources_url: String,

    // Local layout
    pub download_dir: PathBuf,
    pub output_dir: PathBuf,

    // Selection
    pub min_version: Version,
    pub target_locale: String,

    // Network behaviour
    pub max_concurrent_downloads: usize,
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            resources_url: DEFAULT_RESOURCES_URL.to_string(),
            download_dir: PathBuf::from("download"),
            output_dir: PathBuf::from("output"),
            min_version: Version::MIN_SUPPORTED,
            target_locale: "zh_cn".to_string(),
            max_concurrent_downloads: 8,
            http_timeout_secs: 60,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let max_concurrent_downloads = match std::env::var("MAX_CONCURRENT_DOWNLOADS") {
            Ok(v) => v
                .parse::<usize>()
                .context("MAX_CONCURRENT_DOWNLOADS must be a positive integer")?,
            Err(_) => defaults.max_concurrent_downloads,
        };
        if max_concurrent_downloads == 0 {
            bail!("MAX_CONCURRENT_DOWNLOADS must be at least 1");
        }

        Ok(Self {
            manifest_url: std::env::var("MANIFEST_URL").unwrap_or(defaults.manifest_url),
            resources_url: std::env::var("RESOURCES_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.resources_url),

            download_dir: std::env::var("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.download_dir),
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),

            min_version: std::env::var("MIN_VERSION")
                .map(|v| Version::parse(&v))
                .unwrap_or(defaults.min_version),
            target_locale: std::env::var("TARGET_LOCALE")
                .map(|v| v.to_ascii_lowercase())
                .unwrap_or(defaults.target_locale),

            max_concurrent_downloads,
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.http_timeout_secs),
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Whether the command line asks to reuse the download cache.
/// Accepts `--use-cache` and the older `--useCache` spelling.
pub fn use_cache_requested<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .any(|arg| matches!(arg.as_ref(), "--use-cache" | "--useCache"))
}
