//! Declared error definitions.
//!
//! A declared error is part of the API surface: a stable machine-readable
//! code, a human description, an HTTP status and a field set describing its
//! structured detail payload. Endpoints and authenticators list the errors
//! they may emit as "potential errors" for documentation and introspection;
//! the list is not enforced at runtime.

use crate::field::{FieldDef, FieldSet};
use crate::manifest::{valid_name, ManifestErrors};
use http::StatusCode;
use std::sync::Arc;

/// An immutable declared-error definition.
///
/// # Example
///
/// ```
/// use delphi_core::error_def::ErrorDef;
/// use http::StatusCode;
///
/// let not_found = ErrorDef::builder("not_found")
///     .description("The requested resource does not exist")
///     .http_status(StatusCode::NOT_FOUND)
///     .build();
///
/// assert_eq!(not_found.http_status(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug)]
pub struct ErrorDef {
    code: String,
    description: Option<String>,
    http_status: StatusCode,
    fields: FieldSet,
}

impl ErrorDef {
    /// Creates a new error builder.
    #[must_use]
    pub fn builder(code: impl Into<String>) -> ErrorBuilder {
        ErrorBuilder::new(code)
    }

    /// Returns the error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the error description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the HTTP status for responses carrying this error.
    #[must_use]
    pub fn http_status(&self) -> StatusCode {
        self.http_status
    }

    /// Returns the field set describing the structured detail payload.
    #[must_use]
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Reports definition-time problems into the given aggregate.
    pub fn validate(&self, errors: &mut ManifestErrors) {
        let subject = format!("error:{}", self.code);
        if self.code.is_empty() {
            errors.add(&subject, "MissingCode", "errors must have a code");
        } else if !valid_name(&self.code) {
            errors.add(&subject, "InvalidCode", "error codes must be snake_case identifiers");
        }
    }
}

/// Builder for [`ErrorDef`] values.
#[derive(Debug)]
pub struct ErrorBuilder {
    code: String,
    description: Option<String>,
    http_status: StatusCode,
    fields: FieldSet,
}

impl ErrorBuilder {
    /// Creates a new error builder. The HTTP status defaults to 500.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: None,
            http_status: StatusCode::INTERNAL_SERVER_ERROR,
            fields: FieldSet::new(),
        }
    }

    /// Sets the error description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the HTTP status.
    #[must_use]
    pub fn http_status(mut self, status: StatusCode) -> Self {
        self.http_status = status;
        self
    }

    /// Adds a detail field.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.insert(field);
        self
    }

    /// Builds the error definition.
    #[must_use]
    pub fn build(self) -> Arc<ErrorDef> {
        Arc::new(ErrorDef {
            code: self.code,
            description: self.description,
            http_status: self.http_status,
            fields: self.fields,
        })
    }
}
