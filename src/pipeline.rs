//! End-to-end run: download, load each release, merge, write.

use crate::config::Config;
use crate::download::{clear_cache, download_all, VersionFiles};
use crate::http::build_client;
use crate::jar::extract_canonical_lang;
use crate::lang::{parse_path, LangError};
use crate::manifest::{fetch_manifest, fetch_version_indexes, release_urls};
use crate::merge::{
    build_dictionaries, join_version_with_stats, Dictionaries, JoinStats, TermMap,
    VersionedTermMaps,
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const VALUE_INDEX_FILE: &str = "dictionary.json";
pub const KEY_INDEX_FILE: &str = "key_dictionary.json";

/// Parse both tables of one release and join them.
pub fn load_version(files: &VersionFiles) -> Result<(TermMap, JoinStats), LangError> {
    let translated = parse_path(&files.lang_file)?;
    let canonical = extract_canonical_lang(&files.client_jar)?;
    Ok(join_version_with_stats(&translated, &canonical))
}

/// Load every release on the blocking pool. Releases are independent, so they
/// are parsed in parallel; a release that fails to load is logged and skipped.
pub async fn load_versions(files: BTreeMap<String, VersionFiles>) -> VersionedTermMaps {
    let handles: Vec<_> = files
        .into_iter()
        .map(|(version, files)| {
            tokio::task::spawn_blocking(move || {
                let result = load_version(&files);
                (version, result)
            })
        })
        .collect();

    let mut maps = VersionedTermMaps::new();
    for handle in futures::future::join_all(handles).await {
        match handle {
            Ok((version, Ok((terms, stats)))) => {
                debug!(
                    "{}: {} terms ({} joined, {} dropped, {} collisions)",
                    version,
                    terms.len(),
                    stats.joined,
                    stats.dropped,
                    stats.collisions
                );
                if stats.collisions > 0 {
                    info!(
                        "{}: {} identifiers shared a canonical string with another",
                        version, stats.collisions
                    );
                }
                maps.insert(version, terms);
            }
            Ok((version, Err(e))) => warn!("Skipping {}: {}", version, e),
            Err(e) => warn!("Loader task failed: {}", e),
        }
    }

    info!("Loaded {} releases", maps.len());
    maps
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

/// Write both dictionaries into `dir`. Returns the written paths.
pub fn write_outputs(dir: &Path, dictionaries: &Dictionaries) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let value_path = dir.join(VALUE_INDEX_FILE);
    write_json(&value_path, &dictionaries.by_term)?;

    let key_path = dir.join(KEY_INDEX_FILE);
    write_json(&key_path, &dictionaries.by_key)?;

    Ok(vec![value_path, key_path])
}

/// Run the whole job.
pub async fn run(config: &Config, use_cache: bool) -> Result<Dictionaries> {
    if !use_cache {
        clear_cache(&config.download_dir).await?;
    }

    let client = build_client(config)?;

    let manifest = fetch_manifest(&client, config).await?;
    let urls = release_urls(&manifest, config.min_version);
    let indexes = fetch_version_indexes(&client, config, &urls).await;
    let files = download_all(&client, config, &indexes).await;

    let maps = load_versions(files).await;
    if maps.is_empty() {
        anyhow::bail!("No release could be loaded; nothing to merge");
    }

    let dictionaries = build_dictionaries(&maps);

    for path in write_outputs(&config.output_dir, &dictionaries)? {
        info!("Wrote {}", path.display());
    }

    Ok(dictionaries)
}
