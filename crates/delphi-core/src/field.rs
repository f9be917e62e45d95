//! Response field definitions.
//!
//! A field describes a named, typed slot in a serialized response (or in the
//! detail payload of a declared error). A [`FieldSet`] is an ordered set of
//! fields with a [`FieldSet::generate`] operation that renders a source
//! object into the declared shape, applying backend accessors, scalar casts
//! and nested object field sets.

use crate::types::TypeRef;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A backend accessor reading a field's value off a source object.
pub type BackendFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// An immutable field definition.
pub struct FieldDef {
    name: String,
    description: Option<String>,
    type_ref: TypeRef,
    null: bool,
    array: bool,
    backend: Option<BackendFn>,
}

impl FieldDef {
    /// Creates a new field builder.
    #[must_use]
    pub fn builder(name: impl Into<String>, type_ref: impl Into<TypeRef>) -> FieldBuilder {
        FieldBuilder::new(name, type_ref)
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the field's type.
    #[must_use]
    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    /// Returns whether the field may be null.
    #[must_use]
    pub fn null(&self) -> bool {
        self.null
    }

    /// Returns whether the field is array-valued.
    #[must_use]
    pub fn array(&self) -> bool {
        self.array
    }

    /// Reads this field's raw value off a source object.
    ///
    /// The backend accessor takes precedence; without one the value is read
    /// by name from the source object.
    #[must_use]
    pub fn read(&self, source: &Value) -> Value {
        match &self.backend {
            Some(backend) => backend(source),
            None => source.get(&self.name).cloned().unwrap_or(Value::Null),
        }
    }

    /// Renders a raw value into this field's serialized form.
    #[must_use]
    pub fn render(&self, raw: &Value) -> Value {
        if raw.is_null() {
            return Value::Null;
        }
        if self.array {
            if let Some(items) = raw.as_array() {
                return Value::Array(items.iter().map(|item| self.render_single(item)).collect());
            }
        }
        self.render_single(raw)
    }

    fn render_single(&self, raw: &Value) -> Value {
        match &self.type_ref {
            TypeRef::Scalar(scalar) => scalar.cast(raw),
            TypeRef::Object(object) => object.fields().generate(raw),
            TypeRef::Enum(_) | TypeRef::ArgumentSet(_) => raw.clone(),
        }
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("type", &self.type_ref)
            .field("null", &self.null)
            .field("array", &self.array)
            .field("backend", &self.backend.is_some())
            .finish()
    }
}

/// Builder for [`FieldDef`] values.
pub struct FieldBuilder {
    name: String,
    description: Option<String>,
    type_ref: TypeRef,
    null: bool,
    array: bool,
    backend: Option<BackendFn>,
}

impl FieldBuilder {
    /// Creates a new field builder.
    #[must_use]
    pub fn new(name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            description: None,
            type_ref: type_ref.into(),
            null: false,
            array: false,
            backend: None,
        }
    }

    /// Sets the field description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the field as nullable.
    #[must_use]
    pub fn null(mut self, null: bool) -> Self {
        self.null = null;
        self
    }

    /// Marks the field as array-valued.
    #[must_use]
    pub fn array(mut self, array: bool) -> Self {
        self.array = array;
        self
    }

    /// Sets the backend accessor.
    #[must_use]
    pub fn backend<F>(mut self, backend: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.backend = Some(Arc::new(backend));
        self
    }

    /// Builds the field definition.
    #[must_use]
    pub fn build(self) -> FieldDef {
        FieldDef {
            name: self.name,
            description: self.description,
            type_ref: self.type_ref,
            null: self.null,
            array: self.array,
            backend: self.backend,
        }
    }
}

/// An ordered, name-unique set of field definitions.
#[derive(Debug, Default)]
pub struct FieldSet {
    fields: IndexMap<String, FieldDef>,
}

impl FieldSet {
    /// Creates an empty field set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, keyed by its name. A later field with the same name
    /// replaces the earlier one.
    pub fn insert(&mut self, field: FieldDef) {
        self.fields.insert(field.name().to_string(), field);
    }

    /// Returns a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Iterates over the fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.values()
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the set declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Renders a source object into the declared shape.
    ///
    /// Only declared fields appear in the output; anything else on the
    /// source is dropped.
    #[must_use]
    pub fn generate(&self, source: &Value) -> Value {
        let mut out = serde_json::Map::new();
        for field in self.fields.values() {
            let raw = field.read(source);
            out.insert(field.name().to_string(), field.render(&raw));
        }
        Value::Object(out)
    }
}

impl FromIterator<FieldDef> for FieldSet {
    fn from_iter<I: IntoIterator<Item = FieldDef>>(iter: I) -> Self {
        let mut set = Self::new();
        for field in iter {
            set.insert(field);
        }
        set
    }
}
