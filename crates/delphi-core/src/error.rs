//! Request-time error taxonomy.
//!
//! Every failure a pipeline phase can produce is a value of
//! [`ExecutionError`]:
//!
//! - [`ExecutionError::MissingArgument`]: a required argument was absent
//!   after parsing.
//! - [`ExecutionError::InvalidArgument`]: a supplied argument failed to
//!   parse or validate, with the path of enclosing arguments attached.
//! - [`ExecutionError::Declared`]: a declared [`ErrorDef`] raised
//!   deliberately by an action or authenticator, carrying contextual fields
//!   rendered against the error's detail field set.
//! - [`ExecutionError::Runtime`]: the catch-all for any other fault.
//!
//! All four are caught at the pipeline boundary and converted to a response
//! body of the stable shape `{ "error": { code, description, detail } }`.
//! Nothing propagates past the pipeline and nothing unwinds the stack.

use crate::error_def::ErrorDef;
use http::StatusCode;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias using [`ExecutionError`].
pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// The specific way an argument value was invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentIssue {
    /// The scalar's parse hook rejected the raw value.
    ParseError,
    /// The parsed value does not belong to the scalar.
    InvalidScalar,
    /// The raw value is not one of the enum's declared values.
    InvalidEnumValue,
    /// One or more attached validation predicates returned false.
    ValidationErrors,
}

impl ArgumentIssue {
    /// Returns the issue as a stable snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ParseError => "parse_error",
            Self::InvalidScalar => "invalid_scalar",
            Self::InvalidEnumValue => "invalid_enum_value",
            Self::ValidationErrors => "validation_errors",
        }
    }
}

impl fmt::Display for ArgumentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured request-time error.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// A required argument was absent after parsing.
    #[error("missing required argument `{argument}`")]
    MissingArgument {
        /// The name of the absent argument.
        argument: String,
        /// The enclosing argument names, outermost first, ending with the
        /// absent argument itself.
        path: Vec<String>,
    },

    /// A supplied argument failed to parse or validate.
    #[error("invalid value for argument `{argument}` ({issue})")]
    InvalidArgument {
        /// The name of the offending argument.
        argument: String,
        /// The enclosing argument names, outermost first, ending with the
        /// offending argument itself.
        path: Vec<String>,
        /// The element index, when the failure occurred inside an array.
        index: Option<usize>,
        /// The specific kind of invalidity.
        issue: ArgumentIssue,
        /// Supporting messages: the parse failure text, or the names of
        /// failed validation predicates.
        errors: Vec<String>,
    },

    /// A declared error raised deliberately by an action or authenticator.
    #[error("{}", .error.code())]
    Declared {
        /// The declared error definition.
        error: Arc<ErrorDef>,
        /// Contextual fields rendered against the error's detail field set.
        fields: Map<String, Value>,
    },

    /// Any other fault. Unexpected failures always degrade to this variant;
    /// they never produce an unserialized response.
    #[error("{message}")]
    Runtime {
        /// The identity of the raising type, reported in the detail payload.
        class: String,
        /// Human-readable message, reported as the error description.
        message: String,
        /// The underlying fault, when one exists. Not exposed to clients.
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl ExecutionError {
    /// Creates a missing-argument error.
    #[must_use]
    pub fn missing_argument(argument: impl Into<String>, path: Vec<String>) -> Self {
        Self::MissingArgument {
            argument: argument.into(),
            path,
        }
    }

    /// Creates an invalid-argument error.
    #[must_use]
    pub fn invalid_argument(
        argument: impl Into<String>,
        path: Vec<String>,
        index: Option<usize>,
        issue: ArgumentIssue,
        errors: Vec<String>,
    ) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            path,
            index,
            issue,
            errors,
        }
    }

    /// Raises a declared error with no contextual fields.
    #[must_use]
    pub fn declared(error: Arc<ErrorDef>) -> Self {
        Self::Declared {
            error,
            fields: Map::new(),
        }
    }

    /// Raises a declared error with contextual fields.
    #[must_use]
    pub fn declared_with_fields(error: Arc<ErrorDef>, fields: Map<String, Value>) -> Self {
        Self::Declared { error, fields }
    }

    /// Creates a runtime error with a message.
    #[must_use]
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            class: "RuntimeError".to_string(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a runtime error carrying an underlying fault.
    pub fn runtime_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Runtime {
            class: "RuntimeError".to_string(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::MissingArgument { .. } => "missing_required_argument",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::Declared { error, .. } => error.code(),
            Self::Runtime { .. } => "generic_runtime_error",
        }
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::MissingArgument { argument, .. } => {
                format!("`{argument}` is required but was not provided")
            }
            Self::InvalidArgument { argument, issue, .. } => {
                format!("`{argument}` is invalid ({issue})")
            }
            Self::Declared { error, .. } => error
                .description()
                .map_or_else(|| error.code().to_string(), ToString::to_string),
            Self::Runtime { message, .. } => message.clone(),
        }
    }

    /// Returns the HTTP status for a response carrying this error.
    #[must_use]
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::MissingArgument { .. } | Self::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            Self::Declared { error, .. } => error.http_status(),
            Self::Runtime { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the structured detail payload.
    ///
    /// For declared errors the detail is generated from the error's declared
    /// field set against the supplied contextual fields, so undeclared fields
    /// never leak into the response.
    #[must_use]
    pub fn detail(&self) -> Value {
        match self {
            Self::MissingArgument { argument, path } => json!({
                "argument": argument,
                "path": path.join("."),
            }),
            Self::InvalidArgument {
                argument,
                path,
                index,
                issue,
                errors,
            } => {
                let mut detail = Map::new();
                detail.insert("argument".to_string(), json!(argument));
                detail.insert("path".to_string(), json!(path.join(".")));
                detail.insert("issue".to_string(), json!(issue.as_str()));
                if let Some(index) = index {
                    detail.insert("index".to_string(), json!(index));
                }
                if !errors.is_empty() {
                    detail.insert("errors".to_string(), json!(errors));
                }
                Value::Object(detail)
            }
            Self::Declared { error, fields } => {
                error.fields().generate(&Value::Object(fields.clone()))
            }
            Self::Runtime { class, .. } => json!({ "class": class }),
        }
    }

    /// Converts this error to the stable response body shape.
    #[must_use]
    pub fn to_body(&self) -> Value {
        json!({
            "error": {
                "code": self.code(),
                "description": self.description(),
                "detail": self.detail(),
            }
        })
    }
}
