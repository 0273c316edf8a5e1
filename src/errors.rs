// src/errors.rs

//! Crate-wide error types.
//!
//! Layer-local errors ([`crate::resource::FieldError`],
//! [`crate::exec::WaitError`], [`crate::exec::PoolError`],
//! [`crate::dag::GraphParseError`]) live next to the code that raises them.

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::ErrorMap;

/// A dependency declaration that cannot be honoured.
///
/// Raised before any resource is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "resource '{resource}' dependency on '{from_resource}' must set both from_field and to_field or neither (from_field = {from_field:?}, to_field = {to_field:?})"
    )]
    FieldPairing {
        resource: String,
        from_resource: String,
        from_field: String,
        to_field: String,
    },

    #[error("resource '{resource}' depends on unknown resource '{from_resource}'")]
    UnknownResource {
        resource: String,
        from_resource: String,
    },

    #[error("resource '{resource}' has no field '{field}' (referenced by a dependency of '{referenced_by}')")]
    MissingField {
        resource: String,
        field: String,
        referenced_by: String,
    },

    #[error("resource name '{0}' appears more than once")]
    DuplicateResource(String),

    #[error("resource at position {0} has an empty name")]
    EmptyName(usize),
}

/// Failure of one [`crate::engine::Engine::sync`] call.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// One or more resources failed during a construction wave.
    #[error("{0}")]
    Resources(ErrorMap),

    /// The wave budget ran out while resources were still unbuilt and none
    /// of them had failed.
    #[error(
        "max attempts at computing resources exhausted, giving up (unbuilt: {remaining:?}, cycle through: {})",
        .cycle.as_deref().unwrap_or("none")
    )]
    AttemptsExhausted {
        remaining: Vec<String>,
        cycle: Option<String>,
    },

    #[error("failed to delete resource '{name}': {source}")]
    Delete {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("unable to create resource '{name}': unknown resource type '{kind}'")]
    UnknownResourceType { name: String, kind: String },
}

impl SyncError {
    /// Per-resource failures, if this is an aggregated construction error.
    pub fn resource_errors(&self) -> Option<&ErrorMap> {
        match self {
            SyncError::Resources(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SyncError::Validation(_))
    }
}

/// Problems loading or validating a resource manifest.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Manifest error: {0}")]
    Invalid(String),

    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SyncError>;
