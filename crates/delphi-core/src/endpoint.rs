//! Endpoint definitions.
//!
//! An endpoint describes one executable operation: its input argument set,
//! its output fields, its action, an optional authenticator override, and
//! the errors it declares it may emit.

use crate::action::Action;
use crate::argument::ArgumentDef;
use crate::argument_set::{ArgumentSetBuilder, ArgumentSetDef};
use crate::authenticator::AuthenticatorDef;
use crate::error::ExecutionResult;
use crate::error_def::ErrorDef;
use crate::field::{FieldDef, FieldSet};
use crate::manifest::{valid_name, ManifestErrors};
use crate::request::Request;
use crate::response::Response;
use http::Method;
use std::fmt;
use std::sync::Arc;

/// An immutable endpoint definition.
pub struct EndpointDef {
    id: String,
    label: Option<String>,
    description: Option<String>,
    method: Method,
    arguments: Arc<ArgumentSetDef>,
    fields: FieldSet,
    action: Option<Action>,
    authenticator: Option<Arc<AuthenticatorDef>>,
    potential_errors: Vec<Arc<ErrorDef>>,
}

impl EndpointDef {
    /// Creates a new endpoint builder.
    #[must_use]
    pub fn builder(id: impl Into<String>) -> EndpointBuilder {
        EndpointBuilder::new(id)
    }

    /// Returns the endpoint identity.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the endpoint label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the endpoint description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the HTTP method hint.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the input argument-set type.
    #[must_use]
    pub fn arguments(&self) -> &Arc<ArgumentSetDef> {
        &self.arguments
    }

    /// Returns the declared output fields.
    #[must_use]
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Returns the endpoint-level authenticator override, if any.
    #[must_use]
    pub fn authenticator(&self) -> Option<&Arc<AuthenticatorDef>> {
        self.authenticator.as_ref()
    }

    /// Returns the errors this endpoint declares it may emit.
    #[must_use]
    pub fn potential_errors(&self) -> &[Arc<ErrorDef>] {
        &self.potential_errors
    }

    /// Returns whether an action is defined.
    #[must_use]
    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    /// Runs the endpoint action.
    ///
    /// An endpoint without an action cannot execute; the failure degrades
    /// to the runtime catch-all.
    pub fn invoke(&self, request: &Request, response: &mut Response) -> ExecutionResult<()> {
        match &self.action {
            Some(action) => action(request, response),
            None => Err(crate::error::ExecutionError::runtime(format!(
                "endpoint `{}` has no action",
                self.id
            ))),
        }
    }

    /// Reports definition-time problems for this definition alone. The
    /// input argument set is validated when the schema is walked as a
    /// whole.
    pub fn validate(&self, errors: &mut ManifestErrors) {
        let subject = format!("endpoint:{}", self.id);
        if self.id.is_empty() {
            errors.add(&subject, "MissingName", "endpoints must have a name");
        } else if !valid_name(&self.id) {
            errors.add(&subject, "InvalidName", "endpoint names must be snake_case identifiers");
        }
        if self.action.is_none() {
            errors.add(&subject, "MissingAction", "an action must be defined for endpoints");
        }
    }
}

impl fmt::Debug for EndpointDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointDef")
            .field("id", &self.id)
            .field("method", &self.method)
            .field("arguments", &self.arguments.id())
            .field("fields", &self.fields.len())
            .field("action", &self.action.is_some())
            .field("authenticator", &self.authenticator.as_ref().map(|a| a.id()))
            .finish()
    }
}

/// Builder for [`EndpointDef`] values.
pub struct EndpointBuilder {
    id: String,
    label: Option<String>,
    description: Option<String>,
    method: Method,
    arguments: ArgumentSetBuilder,
    argument_set: Option<Arc<ArgumentSetDef>>,
    fields: FieldSet,
    action: Option<Action>,
    authenticator: Option<Arc<AuthenticatorDef>>,
    potential_errors: Vec<Arc<ErrorDef>>,
}

impl EndpointBuilder {
    /// Creates a new endpoint builder. The method defaults to GET.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let arguments = ArgumentSetBuilder::new(format!("{id}_arguments"));
        Self {
            id,
            label: None,
            description: None,
            method: Method::GET,
            arguments,
            argument_set: None,
            fields: FieldSet::new(),
            action: None,
            authenticator: None,
            potential_errors: Vec::new(),
        }
    }

    /// Sets the endpoint label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the endpoint description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the HTTP method hint.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Adds an argument to the endpoint's own argument set.
    #[must_use]
    pub fn argument(mut self, argument: ArgumentDef) -> Self {
        self.arguments = self.arguments.argument(argument);
        self
    }

    /// Replaces the endpoint's argument set with a shared definition.
    /// Arguments added with [`Self::argument`] are discarded.
    #[must_use]
    pub fn argument_set(mut self, set: Arc<ArgumentSetDef>) -> Self {
        self.argument_set = Some(set);
        self
    }

    /// Adds an output field.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.insert(field);
        self
    }

    /// Sets the action.
    #[must_use]
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&Request, &mut Response) -> ExecutionResult<()> + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    /// Sets the endpoint-level authenticator override.
    #[must_use]
    pub fn authenticator(mut self, authenticator: Arc<AuthenticatorDef>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Declares an error this endpoint may emit.
    #[must_use]
    pub fn potential_error(mut self, error: Arc<ErrorDef>) -> Self {
        self.potential_errors.push(error);
        self
    }

    /// Builds the endpoint definition.
    #[must_use]
    pub fn build(self) -> Arc<EndpointDef> {
        let arguments = self.argument_set.unwrap_or_else(|| self.arguments.build());
        Arc::new(EndpointDef {
            id: self.id,
            label: self.label,
            description: self.description,
            method: self.method,
            arguments,
            fields: self.fields,
            action: self.action,
            authenticator: self.authenticator,
            potential_errors: self.potential_errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeRef;

    #[test]
    fn test_builder_collects_arguments() {
        let endpoint = EndpointDef::builder("create_user")
            .argument(ArgumentDef::builder("name", TypeRef::string()).required(true).build())
            .argument(ArgumentDef::builder("age", TypeRef::integer()).build())
            .build();
        assert_eq!(endpoint.arguments().id(), "create_user_arguments");
        assert_eq!(endpoint.arguments().arguments().len(), 2);
    }

    #[test]
    fn test_shared_argument_set_replaces_collected() {
        let shared = ArgumentSetDef::builder("shared").build();
        let endpoint = EndpointDef::builder("create_user")
            .argument(ArgumentDef::builder("ignored", TypeRef::string()).build())
            .argument_set(shared)
            .build();
        assert_eq!(endpoint.arguments().id(), "shared");
        assert!(endpoint.arguments().arguments().is_empty());
    }

    #[test]
    fn test_validate_requires_action() {
        let endpoint = EndpointDef::builder("list_users").build();
        let mut errors = ManifestErrors::new();
        endpoint.validate(&mut errors);
        assert!(errors.codes_for("endpoint:list_users").contains(&"MissingAction"));
    }

    #[test]
    fn test_invoke_without_action_is_a_runtime_fault() {
        use crate::api::ApiDef;
        use crate::controller::ControllerDef;

        let endpoint = EndpointDef::builder("test").build();
        let controller = ControllerDef::builder("tests").endpoint(endpoint.clone()).build();
        let api = ApiDef::builder("example_api").controller(controller.clone()).build();
        let request = Request::builder()
            .api(api)
            .controller(controller)
            .endpoint(endpoint.clone())
            .build();
        let mut response = Response::new();
        let err = endpoint.invoke(&request, &mut response).unwrap_err();
        assert_eq!(err.code(), "generic_runtime_error");
    }
}
