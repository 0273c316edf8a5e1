// src/resource/builtin.rs

//! Built-in resource kinds.

use tracing::debug;

use crate::config::model::ResourceDescriptor;
use crate::engine::SyncContext;
use crate::resource::{BoxFuture, Dependency, FieldError, FieldValue, Resource, ResourceBase};

/// Resource whose state is just its fields.
///
/// `update` reports the field named by the `status_field` property as its
/// status (empty if unset); `delete` does nothing. Useful for dry runs,
/// wiring checks and as a placeholder for resources managed elsewhere.
#[derive(Debug)]
pub struct StaticResource {
    base: ResourceBase,
}

impl StaticResource {
    pub const KIND: &'static str = "static";

    /// Property naming the field reported as status.
    pub const STATUS_FIELD: &'static str = "status_field";

    pub fn new(base: ResourceBase) -> Self {
        Self { base }
    }

    pub fn from_descriptor(desc: &ResourceDescriptor) -> Self {
        let base = ResourceBase::new(desc.name.clone())
            .with_dependencies(desc.dependencies())
            .with_fields(desc.properties.clone());
        Self { base }
    }

    fn status(&self) -> String {
        let fields = self.base.fields();
        fields
            .get_string(Self::STATUS_FIELD)
            .and_then(|field| fields.get_string(&field))
            .unwrap_or_default()
    }
}

impl Resource for StaticResource {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn dependencies(&self) -> &[Dependency] {
        self.base.dependencies()
    }

    fn update<'a>(&'a self, _ctx: &'a SyncContext) -> BoxFuture<'a, anyhow::Result<String>> {
        Box::pin(async move {
            let status = self.status();
            debug!(resource = %self.name(), status = %status, "static resource updated");
            Ok(status)
        })
    }

    fn delete<'a>(&'a self, _ctx: &'a SyncContext) -> BoxFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            debug!(resource = %self.name(), "static resource deleted");
            Ok(())
        })
    }

    fn read_field(&self, field: &str) -> Option<FieldValue> {
        self.base.fields().get(field)
    }

    fn write_field(&self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        self.base.fields().set(field, value)
    }
}
