// src/resource/fields.rs

//! Named-field storage used for value propagation between resources.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::resource::{Dependency, FieldValue};

/// Rejected field write.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("unknown field '{0}'")]
    Unknown(String),

    #[error("field '{field}' rejected value: {reason}")]
    Rejected { field: String, reason: String },
}

/// Mutex-guarded map of declared fields.
///
/// Only fields declared up front (via [`Fields::declare`] or the
/// constructors) can be written with [`Fields::set`]; this is what lets
/// dependency validation check field names before anything runs.
#[derive(Debug, Default)]
pub struct Fields {
    values: Mutex<BTreeMap<String, FieldValue>>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(values: BTreeMap<String, FieldValue>) -> Self {
        Self {
            values: Mutex::new(values),
        }
    }

    /// Declare (or overwrite) a field.
    pub fn declare(&self, name: impl Into<String>, value: FieldValue) {
        self.lock().insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<FieldValue> {
        self.lock().get(name).cloned()
    }

    /// Overwrite a declared field.
    pub fn set(&self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        let mut values = self.lock();
        match values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(FieldError::Unknown(name.to_string())),
        }
    }

    /// Field value rendered as a plain string (strings are not quoted).
    pub fn get_string(&self, name: &str) -> Option<String> {
        self.get(name).map(|v| value_to_string(&v))
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, FieldValue>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Render a field value the way a status string expects it.
pub fn value_to_string(value: &FieldValue) -> String {
    match value {
        FieldValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Name, dependencies and fields: the bookkeeping half of a resource.
///
/// Concrete resources embed one of these and forward the non-behavioural
/// [`crate::resource::Resource`] methods to it.
#[derive(Debug, Default)]
pub struct ResourceBase {
    name: String,
    dependencies: Vec<Dependency>,
    fields: Fields,
}

impl ResourceBase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
            fields: Fields::new(),
        }
    }

    pub fn depends_on(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<Dependency>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_field(self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.declare(name, value.into());
        self
    }

    pub fn with_fields(mut self, fields: BTreeMap<String, FieldValue>) -> Self {
        self.fields = Fields::from_map(fields);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}
