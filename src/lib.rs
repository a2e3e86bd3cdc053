//! Cross-version Minecraft translation dictionary.
//!
//! The library downloads every release's canonical and translated language
//! tables, joins them per release and merges the result into two
//! dictionaries: one keyed by canonical term, one keyed by internal identifier.

pub mod config;
pub mod download;
pub mod http;
pub mod jar;
pub mod lang;
pub mod manifest;
pub mod merge;
pub mod pipeline;
pub mod retry;
pub mod version;

pub use merge::{build_dictionaries, Dictionaries, VersionedTermMaps};
pub use version::Version;
