// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::resource::{Dependency, FieldValue};
use crate::types::WaveScan;

/// Manifest as read from TOML, before validation.
///
/// ```toml
/// [engine]
/// wave_scan = "full"
///
/// [[resource]]
/// name = "kin"
/// type = "static"
/// properties = { Arn = "hello123" }
///
/// [[resource]]
/// name = "dep"
/// type = "static"
/// depends_on = [{ resource = "kin", from_field = "Arn", to_field = "KinesisArn" }]
/// properties = { KinesisArn = "", status_field = "KinesisArn" }
/// ```
///
/// Resources are an array of tables so that declaration order (which fixes
/// vertex numbering) survives deserialization. Unknown top-level sections are
/// rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawManifest {
    #[serde(default)]
    pub engine: EngineSection,

    #[serde(default)]
    pub resource: Vec<ResourceDescriptor>,
}

/// Validated manifest. Build through `Manifest::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub engine: EngineSection,
    pub resource: Vec<ResourceDescriptor>,
}

impl Manifest {
    pub(crate) fn new_unchecked(engine: EngineSection, resource: Vec<ResourceDescriptor>) -> Self {
        Self { engine, resource }
    }
}

/// `[engine]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineSection {
    #[serde(default)]
    pub wave_scan: WaveScan,

    /// Wave budget. Defaults to the number of resources.
    #[serde(default)]
    pub max_attempts: Option<usize>,
}

/// `[[resource]]` entry: what a [`crate::resource::Factory`] builds from.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDescriptor {
    pub name: String,

    /// Type tag used to pick a constructor (`type = "..."` in TOML).
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub depends_on: Vec<DependencyDescriptor>,

    /// Initial field values.
    #[serde(default)]
    pub properties: BTreeMap<String, FieldValue>,
}

impl ResourceDescriptor {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            depends_on: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    pub fn dependencies(&self) -> Vec<Dependency> {
        self.depends_on.iter().map(Dependency::from).collect()
    }
}

/// One `depends_on` entry: either a bare resource name or a table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DependencyDescriptor {
    Name(String),
    Detailed {
        resource: String,
        #[serde(default)]
        from_field: String,
        #[serde(default)]
        to_field: String,
    },
}

impl From<&DependencyDescriptor> for Dependency {
    fn from(desc: &DependencyDescriptor) -> Self {
        match desc {
            DependencyDescriptor::Name(name) => Dependency::on(name.clone()),
            DependencyDescriptor::Detailed {
                resource,
                from_field,
                to_field,
            } => Dependency::with_value(resource.clone(), from_field.clone(), to_field.clone()),
        }
    }
}
