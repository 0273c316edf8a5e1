// src/resource/mod.rs

//! The resource capability consumed by the engine.
//!
//! - [`Resource`] is the trait every managed unit of infrastructure
//!   implements.
//! - [`Dependency`] is a declared edge, optionally carrying a value from a
//!   field of the upstream resource into a field of the dependent.
//! - [`fields`] provides the standard named-field backing state and the
//!   embeddable [`ResourceBase`].
//! - [`factory`] turns manifest descriptors into resources.
//! - [`builtin`] contains the `static` resource kind.

use std::future::Future;
use std::pin::Pin;

pub mod builtin;
pub mod factory;
pub mod fields;

pub use builtin::StaticResource;
pub use factory::{Factory, FactoryRegistry};
pub use fields::{FieldError, Fields, ResourceBase, value_to_string};

use crate::engine::SyncContext;

/// Value carried between resource fields.
pub type FieldValue = toml::Value;

/// Boxed future returned by resource operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Requirement of one resource on another.
///
/// `from_field` / `to_field` are either both empty (ordering only) or both
/// set, in which case the value of `from_field` on the upstream resource is
/// copied into `to_field` on the dependent before it is updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub from_resource: String,
    pub from_field: String,
    pub to_field: String,
}

impl Dependency {
    /// Ordering-only dependency.
    pub fn on(from_resource: impl Into<String>) -> Self {
        Self {
            from_resource: from_resource.into(),
            from_field: String::new(),
            to_field: String::new(),
        }
    }

    /// Dependency that copies `from_field` into `to_field`.
    pub fn with_value(
        from_resource: impl Into<String>,
        from_field: impl Into<String>,
        to_field: impl Into<String>,
    ) -> Self {
        Self {
            from_resource: from_resource.into(),
            from_field: from_field.into(),
            to_field: to_field.into(),
        }
    }

    /// Whether this dependency transfers a value.
    pub fn carries_value(&self) -> bool {
        !self.from_field.is_empty() && !self.to_field.is_empty()
    }

    /// Exactly one of the two field names is set.
    pub fn is_half_paired(&self) -> bool {
        self.from_field.is_empty() != self.to_field.is_empty()
    }
}

/// A named unit of infrastructure with build and teardown operations.
///
/// Implementations are shared across tasks (`Arc<dyn Resource>`), so any
/// state touched by `update`, `delete` or field writes needs interior
/// mutability. [`ResourceBase`] covers the common case.
pub trait Resource: Send + Sync {
    fn name(&self) -> &str;

    fn dependencies(&self) -> &[Dependency];

    /// Create the resource, or bring it up to date. Returns a status string;
    /// empty statuses are not recorded by the engine.
    fn update<'a>(&'a self, ctx: &'a SyncContext) -> BoxFuture<'a, anyhow::Result<String>>;

    /// Tear the resource down.
    fn delete<'a>(&'a self, ctx: &'a SyncContext) -> BoxFuture<'a, anyhow::Result<()>>;

    fn read_field(&self, field: &str) -> Option<FieldValue>;

    fn write_field(&self, field: &str, value: FieldValue) -> Result<(), FieldError>;

    /// Whether `field` can be read and written. Defaults to "readable".
    fn has_field(&self, field: &str) -> bool {
        self.read_field(field).is_some()
    }
}
