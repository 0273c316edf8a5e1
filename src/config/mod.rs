// src/config/mod.rs

//! Resource manifests.
//!
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a manifest from disk (`loader.rs`).
//! - Validate structural invariants (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, parse_str};
pub use model::{DependencyDescriptor, EngineSection, Manifest, RawManifest, ResourceDescriptor};
pub use validate::validate_manifest;
