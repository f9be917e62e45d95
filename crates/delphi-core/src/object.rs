//! Object type definitions.
//!
//! An object is a named composite output type: an ordered set of typed
//! fields rendered at serialization time. Object types may reference each
//! other, including cyclically.

use crate::field::{FieldDef, FieldSet};
use crate::manifest::{valid_name, ManifestErrors};
use std::sync::Arc;

/// An immutable object type definition.
#[derive(Debug)]
pub struct ObjectDef {
    id: String,
    description: Option<String>,
    fields: FieldSet,
}

impl ObjectDef {
    /// Creates a new object builder.
    #[must_use]
    pub fn builder(id: impl Into<String>) -> ObjectBuilder {
        ObjectBuilder::new(id)
    }

    /// Returns the object identity.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the object description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the object's field set.
    #[must_use]
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Reports definition-time problems into the given aggregate.
    pub fn validate(&self, errors: &mut ManifestErrors) {
        let subject = format!("object:{}", self.id);
        if self.id.is_empty() {
            errors.add(&subject, "MissingName", "objects must have a name");
        } else if !valid_name(&self.id) {
            errors.add(&subject, "InvalidName", "object names must be snake_case identifiers");
        }
    }
}

/// Builder for [`ObjectDef`] values.
#[derive(Debug)]
pub struct ObjectBuilder {
    id: String,
    description: Option<String>,
    fields: FieldSet,
}

impl ObjectBuilder {
    /// Creates a new object builder.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
            fields: FieldSet::new(),
        }
    }

    /// Sets the object description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a field.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.insert(field);
        self
    }

    /// Builds the object definition.
    #[must_use]
    pub fn build(self) -> Arc<ObjectDef> {
        Arc::new(ObjectDef {
            id: self.id,
            description: self.description,
            fields: self.fields,
        })
    }
}
