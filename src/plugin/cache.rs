use crate::validator::{Entries, Validator};
use hashbrown::HashMap;
use std::sync::RwLock;

/// The per-input-type mapping from field name to its compiled validator.
///
/// The cache is populated incrementally while the builder processes input fields — insertion
/// order follows field-declaration order — and is never written again once the build completes.
/// Lazy validators hold a shared reference to it and read a type's entries only at execution
/// time, which is what lets a field reference an input type whose own fields haven't been
/// processed yet (including the field's own parent type).
///
/// The lock documents that single-writer window; after the build it's only ever read.
#[derive(Default)]
pub struct FieldValidatorCache {
    inner: RwLock<HashMap<String, Entries>>,
}

impl FieldValidatorCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a field's validator under its parent input type, replacing any previous
    /// validator registered for the same field name.
    pub(crate) fn insert(&self, type_name: &str, field_name: &str, validator: Validator) {
        let mut inner = self
            .inner
            .write()
            .expect("cache lock should not be poisoned");
        let entries = inner.entry(type_name.to_string()).or_default();
        if let Some(entry) = entries.iter_mut().find(|(name, _)| name == field_name) {
            entry.1 = validator;
        } else {
            entries.push((field_name.to_string(), validator));
        }
    }

    /// The complete field-validator entries of one input type. Empty when the type declared no
    /// validated fields, which makes the resulting object validator a pass-through.
    pub(crate) fn entries(&self, type_name: &str) -> Entries {
        self.inner
            .read()
            .expect("cache lock should not be poisoned")
            .get(type_name)
            .cloned()
            .unwrap_or_default()
    }
}
