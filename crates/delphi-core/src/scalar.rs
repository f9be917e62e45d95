//! Scalar type definitions.
//!
//! A scalar is a named leaf type with optional `cast`, `parse` and `validate`
//! hooks. Scalars describe how a raw wire value becomes a typed value
//! ([`ScalarDef::parse`]) and how a typed value is written back out at
//! serialization time ([`ScalarDef::cast`]).
//!
//! The [`builtin`] module provides the standard scalar set (`string`,
//! `integer`, `boolean`, `decimal`, `timestamp`).
//!
//! # Example
//!
//! ```
//! use delphi_core::scalar::builtin;
//! use serde_json::json;
//!
//! let string = builtin::string();
//! assert!(string.is_valid(&json!("hello")));
//! assert!(!string.is_valid(&json!(123)));
//! ```

use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A cast hook applied when a scalar value is serialized into a response.
pub type CastFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// A parse hook applied when a raw wire value is read into a scalar.
pub type ParseFn = Arc<dyn Fn(&Value) -> Result<Value, ParseError> + Send + Sync>;

/// A validation hook deciding whether a parsed value belongs to the scalar.
pub type ValidateFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A failure produced by a scalar `parse` hook.
///
/// Parse failures are ordinary values. The argument-set parser converts them
/// into a typed invalid-argument error; they are never raised as faults.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ParseError {
    /// Human-readable reason the value could not be parsed.
    pub message: String,
}

impl ParseError {
    /// Creates a new parse error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An immutable scalar type definition.
pub struct ScalarDef {
    id: String,
    description: Option<String>,
    cast: Option<CastFn>,
    parse: Option<ParseFn>,
    validate: Option<ValidateFn>,
}

impl ScalarDef {
    /// Creates a new scalar builder.
    #[must_use]
    pub fn builder(id: impl Into<String>) -> ScalarBuilder {
        ScalarBuilder::new(id)
    }

    /// Returns the scalar identity.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the scalar description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Parses a raw wire value into this scalar.
    ///
    /// Null values pass through untouched so that absence and explicit null
    /// are handled by the caller. When no parse hook is defined the raw value
    /// is returned as-is.
    pub fn parse(&self, value: &Value) -> Result<Value, ParseError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        match &self.parse {
            Some(parse) => parse(value),
            None => Ok(value.clone()),
        }
    }

    /// Returns whether a parsed value belongs to this scalar.
    ///
    /// A scalar with no validator accepts every value.
    #[must_use]
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate.as_ref().map_or(true, |validate| validate(value))
    }

    /// Casts a typed value for serialization.
    ///
    /// When no cast hook is defined the value is written out unchanged.
    #[must_use]
    pub fn cast(&self, value: &Value) -> Value {
        self.cast.as_ref().map_or_else(|| value.clone(), |cast| cast(value))
    }

    /// Reports definition-time problems into the given aggregate.
    pub fn validate(&self, errors: &mut crate::manifest::ManifestErrors) {
        let subject = format!("scalar:{}", self.id);
        if self.id.is_empty() {
            errors.add(&subject, "MissingName", "scalars must have a name");
        } else if !crate::manifest::valid_name(&self.id) {
            errors.add(&subject, "InvalidName", "scalar names must be snake_case identifiers");
        }
    }
}

impl fmt::Debug for ScalarDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarDef")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("cast", &self.cast.is_some())
            .field("parse", &self.parse.is_some())
            .field("validate", &self.validate.is_some())
            .finish()
    }
}

/// Builder for [`ScalarDef`] values.
pub struct ScalarBuilder {
    id: String,
    description: Option<String>,
    cast: Option<CastFn>,
    parse: Option<ParseFn>,
    validate: Option<ValidateFn>,
}

impl ScalarBuilder {
    /// Creates a new scalar builder.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
            cast: None,
            parse: None,
            validate: None,
        }
    }

    /// Sets the scalar description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the cast hook.
    #[must_use]
    pub fn cast<F>(mut self, cast: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.cast = Some(Arc::new(cast));
        self
    }

    /// Sets the parse hook.
    #[must_use]
    pub fn parse<F>(mut self, parse: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, ParseError> + Send + Sync + 'static,
    {
        self.parse = Some(Arc::new(parse));
        self
    }

    /// Sets the validation hook.
    #[must_use]
    pub fn validate<F>(mut self, validate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(validate));
        self
    }

    /// Builds the scalar definition.
    #[must_use]
    pub fn build(self) -> Arc<ScalarDef> {
        Arc::new(ScalarDef {
            id: self.id,
            description: self.description,
            cast: self.cast,
            parse: self.parse,
            validate: self.validate,
        })
    }
}

/// The built-in scalar set.
pub mod builtin {
    use super::{Arc, ParseError, ScalarDef, Value};

    /// A UTF-8 string.
    #[must_use]
    pub fn string() -> Arc<ScalarDef> {
        ScalarDef::builder("string")
            .description("A UTF-8 string")
            .validate(Value::is_string)
            .build()
    }

    /// A whole number.
    #[must_use]
    pub fn integer() -> Arc<ScalarDef> {
        ScalarDef::builder("integer")
            .description("A whole number")
            .validate(|value| value.is_i64() || value.is_u64())
            .build()
    }

    /// A true/false value.
    #[must_use]
    pub fn boolean() -> Arc<ScalarDef> {
        ScalarDef::builder("boolean")
            .description("A true or false value")
            .validate(Value::is_boolean)
            .build()
    }

    /// A decimal number.
    #[must_use]
    pub fn decimal() -> Arc<ScalarDef> {
        ScalarDef::builder("decimal")
            .description("A decimal number")
            .validate(Value::is_number)
            .build()
    }

    /// An RFC 3339 timestamp carried as a string on the wire.
    ///
    /// Parsing normalizes the textual representation; any input that is not
    /// a parseable RFC 3339 string fails with a [`ParseError`].
    #[must_use]
    pub fn timestamp() -> Arc<ScalarDef> {
        ScalarDef::builder("timestamp")
            .description("An RFC 3339 timestamp")
            .parse(|value| {
                let raw = value
                    .as_str()
                    .ok_or_else(|| ParseError::new("timestamps must be provided as strings"))?;
                let parsed = chrono::DateTime::parse_from_rfc3339(raw)
                    .map_err(|e| ParseError::new(format!("invalid timestamp: {e}")))?;
                Ok(Value::String(parsed.to_rfc3339()))
            })
            .validate(Value::is_string)
            .build()
    }
}
