//! Enum type definitions.
//!
//! An enum is a named, ordered set of unique string values. A raw wire value
//! is valid for the enum iff it is a string present in the set.

use crate::manifest::ManifestErrors;
use indexmap::IndexSet;
use serde_json::Value;
use std::sync::Arc;

/// An immutable enum type definition.
///
/// # Example
///
/// ```
/// use delphi_core::enums::EnumDef;
///
/// let state = EnumDef::builder("state")
///     .value("active")
///     .value("inactive")
///     .build();
///
/// assert!(state.includes("active"));
/// assert!(!state.includes("archived"));
/// ```
#[derive(Debug)]
pub struct EnumDef {
    id: String,
    description: Option<String>,
    values: IndexSet<String>,
}

impl EnumDef {
    /// Creates a new enum builder.
    #[must_use]
    pub fn builder(id: impl Into<String>) -> EnumBuilder {
        EnumBuilder::new(id)
    }

    /// Returns the enum identity.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the enum description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the declared values in declaration order.
    #[must_use]
    pub fn values(&self) -> &IndexSet<String> {
        &self.values
    }

    /// Returns whether the given string is one of the declared values.
    #[must_use]
    pub fn includes(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    /// Returns whether the given raw wire value is valid for this enum.
    #[must_use]
    pub fn is_valid(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|s| self.includes(s))
    }

    /// Reports definition-time problems into the given aggregate.
    pub fn validate(&self, errors: &mut ManifestErrors) {
        let subject = format!("enum:{}", self.id);
        if self.id.is_empty() {
            errors.add(&subject, "MissingName", "enums must have a name");
        }
        if self.values.is_empty() {
            errors.add(&subject, "MissingValues", "enums must declare at least one value");
        }
    }
}

/// Builder for [`EnumDef`] values.
#[derive(Debug)]
pub struct EnumBuilder {
    id: String,
    description: Option<String>,
    values: IndexSet<String>,
}

impl EnumBuilder {
    /// Creates a new enum builder.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
            values: IndexSet::new(),
        }
    }

    /// Sets the enum description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a value. Duplicates are collapsed, first declaration wins.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.values.insert(value.into());
        self
    }

    /// Adds multiple values.
    #[must_use]
    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values.extend(values.into_iter().map(Into::into));
        self
    }

    /// Builds the enum definition.
    #[must_use]
    pub fn build(self) -> Arc<EnumDef> {
        Arc::new(EnumDef {
            id: self.id,
            description: self.description,
            values: self.values,
        })
    }
}
