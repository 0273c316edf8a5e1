// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{Manifest, RawManifest};
use crate::errors::ConfigError;

/// Read and deserialize a manifest without semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawManifest, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_str(&contents)
}

/// Deserialize manifest text.
pub fn parse_str(contents: &str) -> Result<RawManifest, ConfigError> {
    let raw: RawManifest = toml::from_str(contents)?;
    Ok(raw)
}

/// Load a manifest and run structural validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for empty/duplicate names, empty type tags and sane `[engine]`
///   values.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Manifest, ConfigError> {
    let raw = load_from_path(path)?;
    Manifest::try_from(raw)
}
