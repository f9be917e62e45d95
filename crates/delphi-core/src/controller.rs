//! Controller definitions.
//!
//! A controller groups endpoints and may carry an authenticator that
//! applies to all of them unless an endpoint overrides it.

use crate::authenticator::AuthenticatorDef;
use crate::endpoint::EndpointDef;
use crate::manifest::{valid_name, ManifestErrors};
use indexmap::IndexMap;
use std::sync::Arc;

/// An immutable controller definition.
#[derive(Debug)]
pub struct ControllerDef {
    id: String,
    description: Option<String>,
    endpoints: IndexMap<String, Arc<EndpointDef>>,
    authenticator: Option<Arc<AuthenticatorDef>>,
}

impl ControllerDef {
    /// Creates a new controller builder.
    #[must_use]
    pub fn builder(id: impl Into<String>) -> ControllerBuilder {
        ControllerBuilder::new(id)
    }

    /// Returns the controller identity.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the controller description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the endpoints in declaration order.
    #[must_use]
    pub fn endpoints(&self) -> &IndexMap<String, Arc<EndpointDef>> {
        &self.endpoints
    }

    /// Returns an endpoint by name.
    #[must_use]
    pub fn endpoint(&self, name: &str) -> Option<&Arc<EndpointDef>> {
        self.endpoints.get(name)
    }

    /// Returns the controller-level authenticator, if any.
    #[must_use]
    pub fn authenticator(&self) -> Option<&Arc<AuthenticatorDef>> {
        self.authenticator.as_ref()
    }

    /// Reports definition-time problems for this definition alone. The
    /// declared endpoints are validated when the schema is walked as a
    /// whole.
    pub fn validate(&self, errors: &mut ManifestErrors) {
        let subject = format!("controller:{}", self.id);
        if self.id.is_empty() {
            errors.add(&subject, "MissingName", "controllers must have a name");
        } else if !valid_name(&self.id) {
            errors.add(
                &subject,
                "InvalidName",
                "controller names must be snake_case identifiers",
            );
        }
    }
}

/// Builder for [`ControllerDef`] values.
#[derive(Debug)]
pub struct ControllerBuilder {
    id: String,
    description: Option<String>,
    endpoints: IndexMap<String, Arc<EndpointDef>>,
    authenticator: Option<Arc<AuthenticatorDef>>,
}

impl ControllerBuilder {
    /// Creates a new controller builder.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
            endpoints: IndexMap::new(),
            authenticator: None,
        }
    }

    /// Sets the controller description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an endpoint, keyed by its identity.
    #[must_use]
    pub fn endpoint(mut self, endpoint: Arc<EndpointDef>) -> Self {
        self.endpoints.insert(endpoint.id().to_string(), endpoint);
        self
    }

    /// Sets the controller-level authenticator.
    #[must_use]
    pub fn authenticator(mut self, authenticator: Arc<AuthenticatorDef>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Builds the controller definition.
    #[must_use]
    pub fn build(self) -> Arc<ControllerDef> {
        Arc::new(ControllerDef {
            id: self.id,
            description: self.description,
            endpoints: self.endpoints,
            authenticator: self.authenticator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_keyed_by_id() {
        let controller = ControllerDef::builder("users")
            .endpoint(EndpointDef::builder("list").build())
            .endpoint(EndpointDef::builder("create").build())
            .build();
        assert_eq!(controller.endpoints().len(), 2);
        assert!(controller.endpoint("list").is_some());
        assert!(controller.endpoint("delete").is_none());
    }

    #[test]
    fn test_validate_checks_name() {
        let controller = ControllerDef::builder("Users").build();
        let mut errors = ManifestErrors::new();
        controller.validate(&mut errors);
        assert!(errors.codes_for("controller:Users").contains(&"InvalidName"));
    }
}
