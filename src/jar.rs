//! Canonical language extraction from client archives.

use crate::lang::{parse_content, LangError, LangFormat, LangMap};
use std::io::{Read, Seek};
use std::path::Path;
use tracing::debug;

const LANG_DIR: &str = "assets/minecraft/lang/";
const CANONICAL_LOCALE: &str = "en_us";

/// Pick the canonical language entry among the archive's entry names.
///
/// Candidates live under `assets/minecraft/lang/`, end in `.lang` or `.json`
/// and are not deprecated leftovers. The `en_us` entry wins when present.
pub fn select_lang_entry<'a, I>(names: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let candidates: Vec<&str> = names
        .into_iter()
        .filter(|name| name.starts_with(LANG_DIR))
        .filter(|name| name.ends_with(".lang") || name.ends_with(".json"))
        .filter(|name| !name.contains("deprecated"))
        .collect();

    candidates
        .iter()
        .find(|name| name.to_ascii_lowercase().contains(CANONICAL_LOCALE))
        .or_else(|| candidates.first())
        .copied()
}

/// Read the canonical language table from an open archive.
pub fn read_canonical_lang<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    origin: &Path,
) -> Result<LangMap, LangError> {
    let entry_name = select_lang_entry(archive.file_names())
        .map(str::to_owned)
        .ok_or_else(|| LangError::NoLangEntry(origin.to_path_buf()))?;

    debug!("Reading {} from {}", entry_name, origin.display());

    let mut entry = archive.by_name(&entry_name)?;
    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .map_err(|source| LangError::Io {
            path: origin.join(&entry_name),
            source,
        })?;

    let content = content.strip_prefix('\u{FEFF}').unwrap_or(&content);
    parse_content(content, LangFormat::from_name(&entry_name))
}

/// Open a client jar and extract its canonical language table.
pub fn extract_canonical_lang(jar_path: &Path) -> Result<LangMap, LangError> {
    let file = std::fs::File::open(jar_path).map_err(|source| LangError::Io {
        path: jar_path.to_path_buf(),
        source,
    })?;
    let mut archive = zip::ZipArchive::new(std::io::BufReader::new(file))?;
    read_canonical_lang(&mut archive, jar_path)
}
