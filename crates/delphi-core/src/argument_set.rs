//! Argument sets: composite input types and their validated instances.
//!
//! An [`ArgumentSetDef`] is a composite type whose attributes are
//! [`ArgumentDef`]s; an argument's type may itself be an argument set, so
//! input shapes nest arbitrarily. Building an instance from raw input
//! ([`ArgumentSetDef::build`]) parses and validates recursively and either
//! returns an immutable [`ArgumentSet`] or the first typed error
//! encountered, with the path of enclosing arguments attached for
//! attribution.
//!
//! Unknown keys in the raw input are silently ignored; laxness here is a
//! documented part of the input contract.

use crate::argument::ArgumentDef;
use crate::error::{ArgumentIssue, ExecutionError, ExecutionResult};
use crate::manifest::{valid_name, ManifestErrors};
use crate::types::TypeRef;
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

/// An immutable argument-set type definition.
///
/// # Example
///
/// ```
/// use delphi_core::argument::ArgumentDef;
/// use delphi_core::argument_set::ArgumentSetDef;
/// use delphi_core::types::TypeRef;
/// use serde_json::json;
///
/// let set = ArgumentSetDef::builder("user_arguments")
///     .argument(ArgumentDef::builder("name", TypeRef::string()).required(true).build())
///     .build();
///
/// let built = set.build(&json!({"name": "Phillip"})).unwrap();
/// assert_eq!(built.get("name").and_then(|v| v.as_str()), Some("Phillip"));
/// assert!(set.build(&json!({})).is_err());
/// ```
#[derive(Debug)]
pub struct ArgumentSetDef {
    id: String,
    description: Option<String>,
    arguments: IndexMap<String, ArgumentDef>,
}

impl ArgumentSetDef {
    /// Creates a new argument-set builder.
    #[must_use]
    pub fn builder(id: impl Into<String>) -> ArgumentSetBuilder {
        ArgumentSetBuilder::new(id)
    }

    /// Returns the set's identity.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the set's description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the declared arguments in declaration order.
    #[must_use]
    pub fn arguments(&self) -> &IndexMap<String, ArgumentDef> {
        &self.arguments
    }

    /// Builds a validated instance from raw input.
    ///
    /// The raw input must be a JSON object; anything else is a
    /// runtime-class fault. The first failure aborts construction; no
    /// partial instance is ever returned.
    pub fn build(&self, raw: &Value) -> ExecutionResult<ArgumentSet> {
        self.build_at(raw, &[])
    }

    /// Builds a validated instance as a nested set at the given path.
    pub fn build_at(&self, raw: &Value, path: &[String]) -> ExecutionResult<ArgumentSet> {
        let Some(object) = raw.as_object() else {
            return Err(ExecutionError::runtime(format!(
                "an object was expected for argument set `{}`",
                self.id
            )));
        };

        let mut values: IndexMap<String, ArgumentValue> = IndexMap::new();

        for (key, raw_value) in object {
            let Some(argument) = self.arguments.get(key) else {
                // Unknown key: ignored, not an error.
                continue;
            };
            if raw_value.is_null() {
                // Explicit null is treated as absence; the required scan
                // below decides whether that is acceptable.
                continue;
            }

            let value = resolve_value(argument, raw_value, path)?;

            let failed = argument.validate_value(&value);
            if !failed.is_empty() {
                return Err(ExecutionError::invalid_argument(
                    argument.name(),
                    join_path(path, argument.name()),
                    None,
                    ArgumentIssue::ValidationErrors,
                    failed,
                ));
            }

            values.insert(key.clone(), value);
        }

        for argument in self.arguments.values() {
            if argument.required() && !values.contains_key(argument.name()) {
                return Err(ExecutionError::missing_argument(
                    argument.name(),
                    join_path(path, argument.name()),
                ));
            }
        }

        Ok(ArgumentSet {
            values,
            path: path.to_vec(),
        })
    }

    /// Reports definition-time problems into the given aggregate, including
    /// those of the declared arguments.
    pub fn validate(&self, errors: &mut ManifestErrors) {
        let subject = format!("argument_set:{}", self.id);
        if self.id.is_empty() {
            errors.add(&subject, "MissingName", "argument sets must have a name");
        } else if !valid_name(&self.id) {
            errors.add(
                &subject,
                "InvalidName",
                "argument set names must be snake_case identifiers",
            );
        }
        for argument in self.arguments.values() {
            argument.validate(errors);
        }
    }
}

fn join_path(path: &[String], name: &str) -> Vec<String> {
    let mut full = path.to_vec();
    full.push(name.to_string());
    full
}

/// Resolves one declared argument against its raw value.
///
/// Array-valued arguments resolve each element, attributing the element
/// index; a non-array raw value for an array argument falls through to
/// single-value resolution.
fn resolve_value(
    argument: &ArgumentDef,
    raw: &Value,
    path: &[String],
) -> ExecutionResult<ArgumentValue> {
    if argument.array() {
        if let Some(items) = raw.as_array() {
            let mut resolved = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                resolved.push(resolve_single(argument, item, path, Some(index))?);
            }
            return Ok(ArgumentValue::Array(resolved));
        }
    }
    resolve_single(argument, raw, path, None)
}

fn resolve_single(
    argument: &ArgumentDef,
    raw: &Value,
    path: &[String],
    index: Option<usize>,
) -> ExecutionResult<ArgumentValue> {
    match argument.type_ref() {
        TypeRef::Scalar(scalar) => {
            let parsed = scalar.parse(raw).map_err(|e| {
                ExecutionError::invalid_argument(
                    argument.name(),
                    join_path(path, argument.name()),
                    index,
                    ArgumentIssue::ParseError,
                    vec![e.message],
                )
            })?;
            if !scalar.is_valid(&parsed) {
                return Err(ExecutionError::invalid_argument(
                    argument.name(),
                    join_path(path, argument.name()),
                    index,
                    ArgumentIssue::InvalidScalar,
                    vec![],
                ));
            }
            Ok(ArgumentValue::Value(parsed))
        }
        TypeRef::Enum(def) => {
            if !def.is_valid(raw) {
                return Err(ExecutionError::invalid_argument(
                    argument.name(),
                    join_path(path, argument.name()),
                    index,
                    ArgumentIssue::InvalidEnumValue,
                    vec![],
                ));
            }
            Ok(ArgumentValue::Value(raw.clone()))
        }
        TypeRef::ArgumentSet(def) => {
            // Nested failures propagate with the extended path; they are
            // not rewrapped at this level.
            let nested = def.build_at(raw, &join_path(path, argument.name()))?;
            Ok(ArgumentValue::Set(nested))
        }
        TypeRef::Object(_) => Err(ExecutionError::runtime(format!(
            "argument `{}` is declared with an object type, which cannot be parsed as input",
            argument.name()
        ))),
    }
}

/// A typed value held by a built argument set.
#[derive(Debug, Clone)]
pub enum ArgumentValue {
    /// A scalar or enum leaf value.
    Value(Value),
    /// A nested argument set.
    Set(ArgumentSet),
    /// An array of resolved values.
    Array(Vec<ArgumentValue>),
}

impl ArgumentValue {
    /// Returns the leaf JSON value, if this is a leaf.
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the leaf value as a string slice.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    /// Returns the leaf value as an integer.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_value().and_then(Value::as_i64)
    }

    /// Returns the leaf value as a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.as_value().and_then(Value::as_bool)
    }

    /// Returns the nested argument set, if this is one.
    #[must_use]
    pub fn as_set(&self) -> Option<&ArgumentSet> {
        match self {
            Self::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Returns the array of resolved values, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[ArgumentValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// An immutable, validated argument-set instance.
///
/// Lookup by name fails silently: an unknown name yields `None`, never an
/// error.
#[derive(Debug, Clone, Default)]
pub struct ArgumentSet {
    values: IndexMap<String, ArgumentValue>,
    path: Vec<String>,
}

impl ArgumentSet {
    /// Returns a value by argument name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArgumentValue> {
        self.values.get(name)
    }

    /// Returns a value by a nested path of argument names.
    #[must_use]
    pub fn dig(&self, names: &[&str]) -> Option<&ArgumentValue> {
        let (first, rest) = names.split_first()?;
        let mut current = self.get(first)?;
        for name in rest {
            current = current.as_set()?.get(name)?;
        }
        Some(current)
    }

    /// Returns the names of the arguments present in this instance.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns the path of enclosing argument names this instance was built
    /// under. Empty for a top-level instance.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Returns the number of present arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no arguments are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Builder for [`ArgumentSetDef`] values.
#[derive(Debug)]
pub struct ArgumentSetBuilder {
    id: String,
    description: Option<String>,
    arguments: IndexMap<String, ArgumentDef>,
}

impl ArgumentSetBuilder {
    /// Creates a new argument-set builder.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
            arguments: IndexMap::new(),
        }
    }

    /// Sets the set's description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an argument, keyed by its name.
    #[must_use]
    pub fn argument(mut self, argument: ArgumentDef) -> Self {
        self.arguments.insert(argument.name().to_string(), argument);
        self
    }

    /// Builds the argument-set definition.
    #[must_use]
    pub fn build(self) -> Arc<ArgumentSetDef> {
        Arc::new(ArgumentSetDef {
            id: self.id,
            description: self.description,
            arguments: self.arguments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExecutionError;
    use serde_json::json;

    fn person_set() -> Arc<ArgumentSetDef> {
        ArgumentSetDef::builder("person")
            .argument(ArgumentDef::builder("name", TypeRef::string()).required(true).build())
            .argument(ArgumentDef::builder("age", TypeRef::integer()).build())
            .build()
    }

    // ==================== Construction ====================

    #[test]
    fn test_build_with_valid_input() {
        let set = person_set().build(&json!({"name": "Phillip", "age": 42})).unwrap();
        assert_eq!(set.get("name").and_then(ArgumentValue::as_str), Some("Phillip"));
        assert_eq!(set.get("age").and_then(ArgumentValue::as_i64), Some(42));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let set = person_set()
            .build(&json!({"name": "Phillip", "unknown": true}))
            .unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.get("unknown").is_none());
    }

    #[test]
    fn test_missing_required_argument() {
        let err = person_set().build(&json!({})).unwrap_err();
        match err {
            ExecutionError::MissingArgument { argument, path } => {
                assert_eq!(argument, "name");
                assert_eq!(path, vec!["name".to_string()]);
            }
            other => panic!("expected MissingArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_explicit_null_counts_as_absent() {
        let err = person_set().build(&json!({"name": null})).unwrap_err();
        assert!(matches!(err, ExecutionError::MissingArgument { .. }));
    }

    #[test]
    fn test_non_object_input_is_a_runtime_fault() {
        let err = person_set().build(&json!("not an object")).unwrap_err();
        assert!(matches!(err, ExecutionError::Runtime { .. }));
    }

    // ==================== Scalars ====================

    #[test]
    fn test_invalid_scalar_value() {
        let err = person_set().build(&json!({"name": 123})).unwrap_err();
        match err {
            ExecutionError::InvalidArgument { argument, issue, .. } => {
                assert_eq!(argument, "name");
                assert_eq!(issue, ArgumentIssue::InvalidScalar);
            }
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_scalar_parse_failure() {
        let def = ArgumentSetDef::builder("times")
            .argument(ArgumentDef::builder("at", TypeRef::timestamp()).build())
            .build();
        let err = def.build(&json!({"at": "not-a-time"})).unwrap_err();
        match err {
            ExecutionError::InvalidArgument { issue, errors, .. } => {
                assert_eq!(issue, ArgumentIssue::ParseError);
                assert!(errors[0].contains("invalid timestamp"));
            }
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    // ==================== Enums ====================

    #[test]
    fn test_enum_values() {
        let state = crate::enums::EnumDef::builder("state")
            .value("active")
            .value("inactive")
            .build();
        let def = ArgumentSetDef::builder("filters")
            .argument(ArgumentDef::builder("state", state).build())
            .build();

        let ok = def.build(&json!({"state": "active"})).unwrap();
        assert_eq!(ok.get("state").and_then(ArgumentValue::as_str), Some("active"));

        let err = def.build(&json!({"state": "archived"})).unwrap_err();
        match err {
            ExecutionError::InvalidArgument { issue, .. } => {
                assert_eq!(issue, ArgumentIssue::InvalidEnumValue);
            }
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    // ==================== Arrays ====================

    #[test]
    fn test_array_values_resolve_per_element() {
        let def = ArgumentSetDef::builder("batch")
            .argument(ArgumentDef::builder("names", TypeRef::string()).array(true).build())
            .build();
        let set = def.build(&json!({"names": ["a", "b"]})).unwrap();
        let names = set.get("names").and_then(ArgumentValue::as_array).unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names[1].as_str(), Some("b"));
    }

    #[test]
    fn test_array_failure_records_element_index() {
        let def = ArgumentSetDef::builder("batch")
            .argument(ArgumentDef::builder("names", TypeRef::string()).array(true).build())
            .build();
        let err = def.build(&json!({"names": ["a", 2]})).unwrap_err();
        match err {
            ExecutionError::InvalidArgument { index, .. } => assert_eq!(index, Some(1)),
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_single_value_for_array_argument_resolves_singly() {
        let def = ArgumentSetDef::builder("batch")
            .argument(ArgumentDef::builder("names", TypeRef::string()).array(true).build())
            .build();
        let set = def.build(&json!({"names": "solo"})).unwrap();
        assert_eq!(set.get("names").and_then(ArgumentValue::as_str), Some("solo"));
    }

    // ==================== Nesting ====================

    fn nested_set() -> Arc<ArgumentSetDef> {
        let inner = ArgumentSetDef::builder("address")
            .argument(ArgumentDef::builder("city", TypeRef::string()).required(true).build())
            .build();
        ArgumentSetDef::builder("person")
            .argument(ArgumentDef::builder("name", TypeRef::string()).build())
            .argument(ArgumentDef::builder("address", inner).build())
            .build()
    }

    #[test]
    fn test_nested_sets_resolve() {
        let set = nested_set()
            .build(&json!({"name": "Ada", "address": {"city": "London"}}))
            .unwrap();
        let city = set.dig(&["address", "city"]).unwrap();
        assert_eq!(city.as_str(), Some("London"));
    }

    #[test]
    fn test_nested_failure_extends_path_outermost_first() {
        let err = nested_set()
            .build(&json!({"address": {"city": 42}}))
            .unwrap_err();
        match err {
            ExecutionError::InvalidArgument { argument, path, .. } => {
                assert_eq!(argument, "city");
                assert_eq!(path, vec!["address".to_string(), "city".to_string()]);
            }
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_missing_argument_extends_path() {
        let err = nested_set().build(&json!({"address": {}})).unwrap_err();
        match err {
            ExecutionError::MissingArgument { argument, path } => {
                assert_eq!(argument, "city");
                assert_eq!(path, vec!["address".to_string(), "city".to_string()]);
            }
            other => panic!("expected MissingArgument, got {other:?}"),
        }
    }

    // ==================== Validations ====================

    #[test]
    fn test_validation_errors_report_all_failed_predicates() {
        let def = ArgumentSetDef::builder("signup")
            .argument(
                ArgumentDef::builder("name", TypeRef::string())
                    .validation("min_length", |v| v.as_str().is_some_and(|s| s.len() >= 3))
                    .validation("no_spaces", |v| v.as_str().is_some_and(|s| !s.contains(' ')))
                    .build(),
            )
            .build();
        let err = def.build(&json!({"name": "a b"})).unwrap_err();
        match err {
            ExecutionError::InvalidArgument { issue, errors, .. } => {
                assert_eq!(issue, ArgumentIssue::ValidationErrors);
                assert_eq!(errors, vec!["min_length".to_string(), "no_spaces".to_string()]);
            }
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    // ==================== Lookup ====================

    #[test]
    fn test_lookup_of_unknown_name_is_silent() {
        let set = person_set().build(&json!({"name": "Phillip"})).unwrap();
        assert!(set.get("nope").is_none());
        assert!(set.dig(&["nope", "deeper"]).is_none());
    }
}
