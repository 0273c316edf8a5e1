// src/resource/factory.rs

//! Turning manifest descriptors into resources.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::model::ResourceDescriptor;
use crate::resource::{Resource, StaticResource};

/// Produces a resource for a descriptor.
///
/// Returning `None` means the type tag is not known; the engine reports that
/// as an unknown resource type before running anything.
pub trait Factory: Send + Sync {
    fn create(&self, descriptor: &ResourceDescriptor) -> Option<Arc<dyn Resource>>;
}

type Constructor = Box<dyn Fn(&ResourceDescriptor) -> Arc<dyn Resource> + Send + Sync>;

/// [`Factory`] keyed by type tag.
#[derive(Default)]
pub struct FactoryRegistry {
    constructors: HashMap<String, Constructor>,
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.kinds().collect();
        kinds.sort_unstable();
        f.debug_struct("FactoryRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

impl FactoryRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in kinds (`static`).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(StaticResource::KIND, |desc| -> Arc<dyn Resource> {
            Arc::new(StaticResource::from_descriptor(desc))
        });
        registry
    }

    /// Register a constructor for `kind`, replacing any previous one.
    pub fn register<F>(&mut self, kind: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(&ResourceDescriptor) -> Arc<dyn Resource> + Send + Sync + 'static,
    {
        let kind = kind.into();
        debug!(kind = %kind, "registering resource constructor");
        self.constructors.insert(kind, Box::new(constructor));
        self
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(|s| s.as_str())
    }
}

impl Factory for FactoryRegistry {
    fn create(&self, descriptor: &ResourceDescriptor) -> Option<Arc<dyn Resource>> {
        let ctor = self.constructors.get(&descriptor.kind)?;
        Some(ctor(descriptor))
    }
}
