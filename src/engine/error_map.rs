// src/engine/error_map.rs

//! Per-resource error aggregation.

use std::collections::BTreeMap;
use std::fmt;

/// Errors of a construction wave, keyed by resource name.
///
/// An empty map means "nothing failed". Use [`ErrorMap::into_result`] to
/// collapse it instead of treating a constructed-but-empty map as a failure.
#[derive(Debug, Default)]
pub struct ErrorMap {
    errors: BTreeMap<String, anyhow::Error>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }

    /// Record `err` for `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, err: anyhow::Error) {
        self.errors.insert(name.into(), err);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, name: &str) -> Option<&anyhow::Error> {
        self.errors.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.errors.contains_key(name)
    }

    /// Failed resource names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &anyhow::Error)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `Ok(())` when nothing was recorded, otherwise the map itself.
    pub fn into_result(self) -> Result<(), ErrorMap> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ErrorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, err) in &self.errors {
            write!(f, "{name}:{err};")?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorMap {}

impl IntoIterator for ErrorMap {
    type Item = (String, anyhow::Error);
    type IntoIter = std::collections::btree_map::IntoIter<String, anyhow::Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
