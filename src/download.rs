//! Download cache for asset indexes, client jars and translated language files.
//!
//! Layout under the download directory:
//!
//! ```text
//! assets/<version>.json
//! clients/<version>.jar
//! langs/<version>.<lang|json>
//! ```

use crate::config::Config;
use crate::http::download_file;
use crate::lang::LangFormat;
use crate::manifest::VersionIndex;
use crate::retry::RetryConfig;
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Local files for one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionFiles {
    pub asset_index: PathBuf,
    pub client_jar: PathBuf,
    pub lang_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetIndex {
    pub objects: HashMap<String, AssetObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetObject {
    pub hash: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// One copy per release, even where releases share a remote index.
    pub fn asset_index(&self, version: &str) -> PathBuf {
        self.root.join("assets").join(format!("{}.json", version))
    }

    pub fn client_jar(&self, version: &str) -> PathBuf {
        self.root.join("clients").join(format!("{}.jar", version))
    }

    pub fn lang_file(&self, version: &str, format: LangFormat) -> PathBuf {
        self.root
            .join("langs")
            .join(format!("{}.{}", version, format.extension()))
    }
}

/// Asset paths that may hold the translated table for `locale`, most specific first.
///
/// Old asset indexes use `zh_CN`-style names, newer ones `zh_cn`; some indexes
/// drop the `minecraft/` prefix.
pub fn lang_candidates(locale: &str) -> Vec<String> {
    let lower = locale.to_ascii_lowercase();
    let mixed = match lower.split_once('_') {
        Some((language, region)) => format!("{}_{}", language, region.to_ascii_uppercase()),
        None => lower.clone(),
    };

    let mut candidates = Vec::new();
    for prefix in ["minecraft/lang/", "lang/"] {
        for format in [LangFormat::Lang, LangFormat::Json] {
            for name in [&mixed, &lower] {
                let candidate = format!("{}{}.{}", prefix, name, format.extension());
                if !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }
    }
    candidates
}

/// Find the translated language object in an asset index.
pub fn find_translated_lang<'a>(
    index: &'a AssetIndex,
    locale: &str,
) -> Option<(String, &'a AssetObject)> {
    lang_candidates(locale)
        .into_iter()
        .find_map(|name| index.objects.get(&name).map(|object| (name, object)))
}

/// URL of a hashed object in the resource store.
pub fn object_url(resources_url: &str, hash: &str) -> String {
    let prefix = hash.get(..2).unwrap_or(hash);
    format!("{}/{}/{}", resources_url.trim_end_matches('/'), prefix, hash)
}

/// Download `url` unless `path` is already present. Returns whether a download happened.
pub async fn download_if_missing(
    client: &reqwest::Client,
    url: &str,
    path: &Path,
    retry: &RetryConfig,
) -> Result<bool> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        debug!("{} already present, skipping download", path.display());
        return Ok(false);
    }

    let bytes = download_file(client, url, path, retry).await?;
    info!("Downloaded {} ({} bytes)", path.display(), bytes);
    Ok(true)
}

/// Remove the download directory so the next run starts from scratch.
pub async fn clear_cache(root: &Path) -> Result<()> {
    if tokio::fs::try_exists(root).await.unwrap_or(false) {
        tokio::fs::remove_dir_all(root)
            .await
            .with_context(|| format!("Failed to remove {}", root.display()))?;
        info!("Removed cached downloads in {}", root.display());
    }
    Ok(())
}

/// Fetch everything one release needs.
///
/// Returns `Ok(None)` when the release's asset index carries no translated table.
pub async fn download_version(
    client: &reqwest::Client,
    config: &Config,
    layout: &CacheLayout,
    version: &str,
    index: &VersionIndex,
) -> Result<Option<VersionFiles>> {
    let retry = RetryConfig::download();

    let asset_index = layout.asset_index(version);
    download_if_missing(client, &index.asset_index_url, &asset_index, &retry)
        .await
        .with_context(|| format!("Failed to download asset index for {}", version))?;

    let client_jar = layout.client_jar(version);
    download_if_missing(client, &index.client_url, &client_jar, &retry)
        .await
        .with_context(|| format!("Failed to download client jar for {}", version))?;

    let raw = tokio::fs::read_to_string(&asset_index)
        .await
        .with_context(|| format!("Failed to read {}", asset_index.display()))?;
    let assets: AssetIndex = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid asset index {}", asset_index.display()))?;

    let Some((name, object)) = find_translated_lang(&assets, &config.target_locale) else {
        warn!(
            "{}: asset index has no {} language file",
            version, config.target_locale
        );
        return Ok(None);
    };

    debug!(
        "{}: translated table is {} ({} bytes)",
        version, name, object.size
    );
    let lang_file = layout.lang_file(version, LangFormat::from_name(&name));
    let url = object_url(&config.resources_url, &object.hash);
    download_if_missing(client, &url, &lang_file, &retry)
        .await
        .with_context(|| format!("Failed to download {} for {}", name, version))?;

    Ok(Some(VersionFiles {
        asset_index,
        client_jar,
        lang_file,
    }))
}

/// Download every release, bounded by `max_concurrent_downloads`.
///
/// Failed or incomplete releases are logged and left out of the result.
pub async fn download_all(
    client: &reqwest::Client,
    config: &Config,
    indexes: &BTreeMap<String, VersionIndex>,
) -> BTreeMap<String, VersionFiles> {
    let layout = CacheLayout::new(&config.download_dir);
    let total = indexes.len();

    let results: Vec<_> = stream::iter(indexes.iter())
        .map(|(version, index)| {
            let layout = &layout;
            async move {
                let result = download_version(client, config, layout, version, index).await;
                (version, result)
            }
        })
        .buffer_unordered(config.max_concurrent_downloads)
        .collect()
        .await;

    let mut files = BTreeMap::new();
    for (version, result) in results {
        match result {
            Ok(Some(version_files)) => {
                files.insert(version.clone(), version_files);
            }
            Ok(None) => {}
            Err(e) => warn!("Skipping {}: {:#}", version, e),
        }
    }

    info!("Downloaded files for {}/{} releases", files.len(), total);
    files
}
