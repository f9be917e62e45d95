//! API definitions.
//!
//! An API is the root of the schema: a named set of controllers plus an
//! optional API-wide authenticator. Definitions are assembled once at
//! process start and treated as immutable for the lifetime of the process;
//! all request-time mutation happens on per-request objects.

use crate::authenticator::AuthenticatorDef;
use crate::controller::ControllerDef;
use crate::manifest::{valid_name, ManifestErrors};
use indexmap::IndexMap;
use std::sync::Arc;

/// An immutable API definition.
///
/// # Example
///
/// ```
/// use delphi_core::api::ApiDef;
/// use delphi_core::controller::ControllerDef;
/// use delphi_core::endpoint::EndpointDef;
///
/// let api = ApiDef::builder("example_api")
///     .controller(
///         ControllerDef::builder("users")
///             .endpoint(EndpointDef::builder("list").build())
///             .build(),
///     )
///     .build();
///
/// assert_eq!(api.controllers().len(), 1);
/// ```
#[derive(Debug)]
pub struct ApiDef {
    id: String,
    description: Option<String>,
    controllers: IndexMap<String, Arc<ControllerDef>>,
    authenticator: Option<Arc<AuthenticatorDef>>,
}

impl ApiDef {
    /// Creates a new API builder.
    #[must_use]
    pub fn builder(id: impl Into<String>) -> ApiBuilder {
        ApiBuilder::new(id)
    }

    /// Returns the API identity.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the API description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the controllers in declaration order.
    #[must_use]
    pub fn controllers(&self) -> &IndexMap<String, Arc<ControllerDef>> {
        &self.controllers
    }

    /// Returns a controller by name.
    #[must_use]
    pub fn controller(&self, name: &str) -> Option<&Arc<ControllerDef>> {
        self.controllers.get(name)
    }

    /// Returns the API-wide authenticator, if any.
    #[must_use]
    pub fn authenticator(&self) -> Option<&Arc<AuthenticatorDef>> {
        self.authenticator.as_ref()
    }

    /// Reports definition-time problems for this definition alone.
    ///
    /// Walking every reachable definition is the introspector's job; see
    /// `delphi-introspect`'s `validate_all`.
    pub fn validate(&self, errors: &mut ManifestErrors) {
        let subject = format!("api:{}", self.id);
        if self.id.is_empty() {
            errors.add(&subject, "MissingName", "APIs must have a name");
        } else if !valid_name(&self.id) {
            errors.add(&subject, "InvalidName", "API names must be snake_case identifiers");
        }
    }
}

/// Builder for [`ApiDef`] values.
#[derive(Debug)]
pub struct ApiBuilder {
    id: String,
    description: Option<String>,
    controllers: IndexMap<String, Arc<ControllerDef>>,
    authenticator: Option<Arc<AuthenticatorDef>>,
}

impl ApiBuilder {
    /// Creates a new API builder.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
            controllers: IndexMap::new(),
            authenticator: None,
        }
    }

    /// Sets the API description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a controller, keyed by its identity.
    #[must_use]
    pub fn controller(mut self, controller: Arc<ControllerDef>) -> Self {
        self.controllers.insert(controller.id().to_string(), controller);
        self
    }

    /// Sets the API-wide authenticator.
    #[must_use]
    pub fn authenticator(mut self, authenticator: Arc<AuthenticatorDef>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Builds the API definition.
    #[must_use]
    pub fn build(self) -> Arc<ApiDef> {
        Arc::new(ApiDef {
            id: self.id,
            description: self.description,
            controllers: self.controllers,
            authenticator: self.authenticator,
        })
    }
}
