#![allow(dead_code)]

use syncgraph::config::{
    DependencyDescriptor, EngineSection, Manifest, RawManifest, ResourceDescriptor,
};
use syncgraph::resource::FieldValue;
use syncgraph::types::WaveScan;

/// Builder for `Manifest` to simplify test setup.
pub struct ManifestBuilder {
    manifest: RawManifest,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self {
            manifest: RawManifest {
                engine: EngineSection::default(),
                resource: Vec::new(),
            },
        }
    }

    pub fn with_resource(mut self, resource: ResourceDescriptor) -> Self {
        self.manifest.resource.push(resource);
        self
    }

    pub fn wave_scan(mut self, scan: WaveScan) -> Self {
        self.manifest.engine.wave_scan = scan;
        self
    }

    pub fn max_attempts(mut self, n: usize) -> Self {
        self.manifest.engine.max_attempts = Some(n);
        self
    }

    pub fn build_raw(self) -> RawManifest {
        self.manifest
    }

    pub fn build(self) -> Manifest {
        Manifest::try_from(self.manifest).expect("Failed to build valid manifest from builder")
    }
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ResourceDescriptor`.
pub struct DescriptorBuilder {
    desc: ResourceDescriptor,
}

impl DescriptorBuilder {
    pub fn new(name: &str, kind: &str) -> Self {
        Self {
            desc: ResourceDescriptor::new(name, kind),
        }
    }

    /// `static` resource.
    pub fn static_resource(name: &str) -> Self {
        Self::new(name, "static")
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.desc
            .depends_on
            .push(DependencyDescriptor::Name(dep.to_string()));
        self
    }

    pub fn after_value(mut self, dep: &str, from_field: &str, to_field: &str) -> Self {
        self.desc.depends_on.push(DependencyDescriptor::Detailed {
            resource: dep.to_string(),
            from_field: from_field.to_string(),
            to_field: to_field.to_string(),
        });
        self
    }

    pub fn property(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.desc.properties.insert(name.to_string(), value.into());
        self
    }

    pub fn build(self) -> ResourceDescriptor {
        self.desc
    }
}
