//! Argument definitions.
//!
//! An argument describes a named, typed, optionally-required,
//! optionally-array-valued input slot with attached validation predicates.
//! Argument types are scalars, enums or nested argument sets; object types
//! are output-only.

use crate::argument_set::ArgumentValue;
use crate::manifest::{valid_name, ManifestErrors};
use crate::types::TypeRef;
use std::fmt;
use std::sync::Arc;

/// A validation predicate run against an argument's final resolved value.
pub type ValidationFn = Arc<dyn Fn(&ArgumentValue) -> bool + Send + Sync>;

/// A named validation predicate.
#[derive(Clone)]
pub struct Validation {
    name: String,
    check: ValidationFn,
}

impl Validation {
    /// Creates a named validation predicate.
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&ArgumentValue) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// Returns the predicate's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the predicate.
    #[must_use]
    pub fn check(&self, value: &ArgumentValue) -> bool {
        (self.check)(value)
    }
}

impl fmt::Debug for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation({})", self.name)
    }
}

/// An immutable argument definition.
///
/// # Example
///
/// ```
/// use delphi_core::argument::ArgumentDef;
/// use delphi_core::types::TypeRef;
///
/// let name = ArgumentDef::builder("name", TypeRef::string())
///     .required(true)
///     .build();
///
/// assert!(name.required());
/// assert!(!name.array());
/// ```
#[derive(Debug)]
pub struct ArgumentDef {
    name: String,
    description: Option<String>,
    type_ref: TypeRef,
    required: bool,
    array: bool,
    validations: Vec<Validation>,
}

impl ArgumentDef {
    /// Creates a new argument builder.
    ///
    /// The type is part of construction; an argument without a type cannot
    /// be expressed.
    #[must_use]
    pub fn builder(name: impl Into<String>, type_ref: impl Into<TypeRef>) -> ArgumentBuilder {
        ArgumentBuilder::new(name, type_ref)
    }

    /// Returns the argument name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the argument description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the argument's type.
    #[must_use]
    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    /// Returns whether the argument must be present.
    #[must_use]
    pub fn required(&self) -> bool {
        self.required
    }

    /// Returns whether the argument is array-valued.
    #[must_use]
    pub fn array(&self) -> bool {
        self.array
    }

    /// Returns the attached validation predicates.
    #[must_use]
    pub fn validations(&self) -> &[Validation] {
        &self.validations
    }

    /// Runs every attached predicate against a resolved value and returns
    /// the names of those that failed. All predicates are evaluated; the
    /// result is empty when the value passes.
    #[must_use]
    pub fn validate_value(&self, value: &ArgumentValue) -> Vec<String> {
        self.validations
            .iter()
            .filter(|validation| !validation.check(value))
            .map(|validation| validation.name().to_string())
            .collect()
    }

    /// Reports definition-time problems into the given aggregate.
    pub fn validate(&self, errors: &mut ManifestErrors) {
        let subject = format!("argument:{}", self.name);
        if self.name.is_empty() {
            errors.add(&subject, "MissingName", "arguments must have a name");
        } else if !valid_name(&self.name) {
            errors.add(
                &subject,
                "InvalidName",
                "argument names must be snake_case identifiers",
            );
        }
        if matches!(self.type_ref, TypeRef::Object(_)) {
            errors.add(
                &subject,
                "InvalidType",
                "object types cannot be used as argument types",
            );
        }
    }
}

/// Builder for [`ArgumentDef`] values.
#[derive(Debug)]
pub struct ArgumentBuilder {
    name: String,
    description: Option<String>,
    type_ref: TypeRef,
    required: bool,
    array: bool,
    validations: Vec<Validation>,
}

impl ArgumentBuilder {
    /// Creates a new argument builder.
    #[must_use]
    pub fn new(name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            description: None,
            type_ref: type_ref.into(),
            required: false,
            array: false,
            validations: Vec::new(),
        }
    }

    /// Sets the argument description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the argument as required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Marks the argument as array-valued.
    #[must_use]
    pub fn array(mut self, array: bool) -> Self {
        self.array = array;
        self
    }

    /// Attaches a named validation predicate.
    #[must_use]
    pub fn validation<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&ArgumentValue) -> bool + Send + Sync + 'static,
    {
        self.validations.push(Validation::new(name, check));
        self
    }

    /// Builds the argument definition.
    #[must_use]
    pub fn build(self) -> ArgumentDef {
        ArgumentDef {
            name: self.name,
            description: self.description,
            type_ref: self.type_ref,
            required: self.required,
            array: self.array,
            validations: self.validations,
        }
    }
}
