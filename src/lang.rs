//! Language file parsing.
//!
//! Releases up to 1.12 ship legacy `key=value` `.lang` files; later releases
//! ship flat JSON objects. Both are turned into a [`LangMap`] from internal
//! identifier to display string.

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Internal identifier -> display string, for one locale of one release,
/// in the order the identifiers appear in the file.
pub type LangMap = IndexMap<String, String>;

/// Errors raised while reading or parsing language files.
#[derive(Error, Debug)]
pub enum LangError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON language file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid JSON-with-comments language file: {0}")]
    Jsonc(String),
    #[error("Language file root is not an object")]
    NotAnObject,
    #[error("Failed to read client archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("No language entry found in {}", .0.display())]
    NoLangEntry(PathBuf),
}

/// On-disk format of a language file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LangFormat {
    Lang,
    Json,
}

impl LangFormat {
    /// Pick the format from a file or archive entry name.
    pub fn from_name(name: &str) -> Self {
        if name.to_ascii_lowercase().ends_with(".json") {
            LangFormat::Json
        } else {
            LangFormat::Lang
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            LangFormat::Lang => "lang",
            LangFormat::Json => "json",
        }
    }
}

fn noise_pattern() -> &'static Regex {
    static NOISE: OnceLock<Regex> = OnceLock::new();
    NOISE.get_or_init(|| {
        Regex::new(r"[\u{FEFF}\u{200B}-\u{200D}\u{2060}\r\n\t\x08\x0C\x0B]")
            .expect("noise pattern is valid")
    })
}

/// Strip zero-width characters, byte order marks and control characters.
pub fn clean_text(text: &str) -> String {
    noise_pattern().replace_all(text, "").into_owned()
}

/// Parse a legacy `key=value` file. Only the first `=` separates key from value.
pub fn parse_lang(content: &str) -> LangMap {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (clean_text(key), clean_text(value)))
        .collect()
}

/// Parse a flat JSON language object. Non-string values are ignored.
pub fn parse_json(content: &str) -> Result<LangMap, LangError> {
    // A few shipped files use `"key"="value"` instead of `"key":"value"`.
    let content = content.replace("\"=\"", "\":\"");

    let value = if content.contains("//") {
        jsonc_parser::parse_to_serde_value(&content, &Default::default())
            .map_err(|e| LangError::Jsonc(e.to_string()))?
            .unwrap_or(Value::Null)
    } else {
        serde_json::from_str(&content)?
    };

    let Value::Object(entries) = value else {
        return Err(LangError::NotAnObject);
    };

    Ok(entries
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((clean_text(&key), clean_text(&s))),
            _ => None,
        })
        .collect())
}

/// Parse language file content in the given format.
pub fn parse_content(content: &str, format: LangFormat) -> Result<LangMap, LangError> {
    match format {
        LangFormat::Json => parse_json(content),
        LangFormat::Lang => Ok(parse_lang(content)),
    }
}

/// Read and parse a language file, choosing the format from its extension.
pub fn parse_path(path: &Path) -> Result<LangMap, LangError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LangError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = raw.strip_prefix('\u{FEFF}').unwrap_or(&raw);
    let name = path.to_string_lossy();
    parse_content(content, LangFormat::from_name(&name))
}
