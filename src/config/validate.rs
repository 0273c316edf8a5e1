// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{Manifest, RawManifest};
use crate::errors::ConfigError;

impl TryFrom<RawManifest> for Manifest {
    type Error = ConfigError;

    fn try_from(raw: RawManifest) -> std::result::Result<Self, Self::Error> {
        validate_manifest(&raw)?;
        Ok(Manifest::new_unchecked(raw.engine, raw.resource))
    }
}

/// Structural checks on a raw manifest.
///
/// Dependency semantics (unknown targets, field pairing, field presence) are
/// checked by the engine at sync time against the constructed resources.
pub fn validate_manifest(raw: &RawManifest) -> Result<(), ConfigError> {
    ensure_has_resources(raw)?;
    validate_engine_section(raw)?;
    validate_resource_names(raw)?;
    Ok(())
}

fn ensure_has_resources(raw: &RawManifest) -> Result<(), ConfigError> {
    if raw.resource.is_empty() {
        return Err(ConfigError::Invalid(
            "manifest must contain at least one [[resource]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_engine_section(raw: &RawManifest) -> Result<(), ConfigError> {
    if raw.engine.max_attempts == Some(0) {
        return Err(ConfigError::Invalid(
            "[engine].max_attempts must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_resource_names(raw: &RawManifest) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for (idx, res) in raw.resource.iter().enumerate() {
        if res.name.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "resource #{} has an empty name",
                idx + 1
            )));
        }
        if res.kind.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "resource '{}' has an empty type",
                res.name
            )));
        }
        if !seen.insert(res.name.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "resource '{}' is declared more than once",
                res.name
            )));
        }
    }
    Ok(())
}
