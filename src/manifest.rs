use crate::config::Config;
use crate::http::get_json;
use crate::retry::RetryConfig;
use crate::version::Version;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct VersionManifest {
    pub latest: LatestVersions,
    pub versions: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestVersions {
    pub release: String,
    pub snapshot: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub release_time: DateTime<Utc>,
}

impl ManifestEntry {
    pub fn is_release(&self) -> bool {
        self.kind == "release"
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionMetadata {
    asset_index: UrlRef,
    downloads: Downloads,
}

#[derive(Debug, Deserialize)]
struct Downloads {
    client: UrlRef,
}

#[derive(Debug, Deserialize)]
struct UrlRef {
    url: String,
}

/// Where to find one release's asset index and client jar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionIndex {
    pub asset_index_url: String,
    pub client_url: String,
}

/// Fetch the launcher's version manifest
pub async fn fetch_manifest(client: &reqwest::Client, config: &Config) -> Result<VersionManifest> {
    info!("Fetching version manifest from {}", config.manifest_url);

    let manifest: VersionManifest = get_json(client, &config.manifest_url, &RetryConfig::metadata())
        .await
        .context("Failed to fetch version manifest")?;

    let latest_time = manifest
        .versions
        .iter()
        .find(|entry| entry.id == manifest.latest.release)
        .map(|entry| entry.release_time.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "?".to_string());
    info!(
        "Latest release: {} ({}), latest snapshot: {}, {} manifest entries",
        manifest.latest.release,
        latest_time,
        manifest.latest.snapshot,
        manifest.versions.len()
    );

    Ok(manifest)
}

/// Release id -> metadata URL, for every release at or after `min_version`.
pub fn release_urls(manifest: &VersionManifest, min_version: Version) -> BTreeMap<String, String> {
    let urls: BTreeMap<String, String> = manifest
        .versions
        .iter()
        .filter(|entry| entry.is_release())
        .filter(|entry| Version::parse(&entry.id) >= min_version)
        .map(|entry| (entry.id.clone(), entry.url.clone()))
        .collect();

    info!("{} releases at or after {}", urls.len(), min_version);
    urls
}

/// Resolve the asset index and client URLs of each release.
///
/// Releases whose metadata cannot be fetched are logged and left out.
pub async fn fetch_version_indexes(
    client: &reqwest::Client,
    config: &Config,
    urls: &BTreeMap<String, String>,
) -> BTreeMap<String, VersionIndex> {
    let retry = RetryConfig::metadata();

    let results: Vec<_> = stream::iter(urls.iter())
        .map(|(id, url)| {
            let retry = &retry;
            async move {
                let result = get_json::<VersionMetadata>(client, url, retry).await;
                (id, result)
            }
        })
        .buffer_unordered(config.max_concurrent_downloads)
        .collect()
        .await;

    let mut indexes = BTreeMap::new();
    for (id, result) in results {
        match result {
            Ok(metadata) => {
                indexes.insert(
                    id.clone(),
                    VersionIndex {
                        asset_index_url: metadata.asset_index.url,
                        client_url: metadata.downloads.client.url,
                    },
                );
            }
            Err(e) => warn!("Skipping {}: {}", id, e),
        }
    }

    info!("Resolved metadata for {}/{} releases", indexes.len(), urls.len());
    indexes
}
