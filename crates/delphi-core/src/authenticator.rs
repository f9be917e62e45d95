//! Authenticator definitions.
//!
//! An authenticator is a named action that admits or rejects a request
//! before arguments are parsed. The verification mechanism itself (token
//! checks, session lookups) is the caller's business; the definition only
//! carries the kind, the action and the errors it may emit.

use crate::action::Action;
use crate::error::ExecutionResult;
use crate::error_def::ErrorDef;
use crate::manifest::{valid_name, ManifestErrors};
use crate::request::Request;
use crate::response::Response;
use std::fmt;
use std::sync::Arc;

/// The recognized authenticator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthenticatorKind {
    /// Bearer-token authentication.
    Bearer,
    /// No credentials; the authenticator admits everyone.
    Anonymous,
}

impl AuthenticatorKind {
    /// Returns the kind as a stable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bearer => "bearer",
            Self::Anonymous => "anonymous",
        }
    }

    /// Returns all recognized kinds.
    #[must_use]
    pub const fn all() -> [AuthenticatorKind; 2] {
        [Self::Bearer, Self::Anonymous]
    }
}

impl fmt::Display for AuthenticatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable authenticator definition.
pub struct AuthenticatorDef {
    id: String,
    description: Option<String>,
    kind: Option<AuthenticatorKind>,
    action: Option<Action>,
    potential_errors: Vec<Arc<ErrorDef>>,
}

impl AuthenticatorDef {
    /// Creates a new authenticator builder.
    #[must_use]
    pub fn builder(id: impl Into<String>) -> AuthenticatorBuilder {
        AuthenticatorBuilder::new(id)
    }

    /// Returns the authenticator identity.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the authenticator description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the authenticator kind, if one was declared.
    #[must_use]
    pub fn kind(&self) -> Option<AuthenticatorKind> {
        self.kind
    }

    /// Returns the errors this authenticator declares it may emit.
    #[must_use]
    pub fn potential_errors(&self) -> &[Arc<ErrorDef>] {
        &self.potential_errors
    }

    /// Runs the authenticator action against the request.
    ///
    /// A definition without an action is a definition-time mistake; if such
    /// an authenticator is actually exercised the failure degrades to the
    /// runtime catch-all.
    pub fn invoke(&self, request: &Request, response: &mut Response) -> ExecutionResult<()> {
        match &self.action {
            Some(action) => action(request, response),
            None => Err(crate::error::ExecutionError::runtime(format!(
                "authenticator `{}` has no action",
                self.id
            ))),
        }
    }

    /// Reports definition-time problems into the given aggregate.
    pub fn validate(&self, errors: &mut ManifestErrors) {
        let subject = format!("authenticator:{}", self.id);
        if self.id.is_empty() {
            errors.add(&subject, "MissingName", "authenticators must have a name");
        } else if !valid_name(&self.id) {
            errors.add(
                &subject,
                "InvalidName",
                "authenticator names must be snake_case identifiers",
            );
        }
        if self.kind.is_none() {
            errors.add(&subject, "MissingKind", "a kind must be defined for authenticators");
        }
        if self.action.is_none() {
            errors.add(&subject, "MissingAction", "an action must be defined for authenticators");
        }
    }
}

impl fmt::Debug for AuthenticatorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatorDef")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("action", &self.action.is_some())
            .field("potential_errors", &self.potential_errors.len())
            .finish()
    }
}

/// Builder for [`AuthenticatorDef`] values.
pub struct AuthenticatorBuilder {
    id: String,
    description: Option<String>,
    kind: Option<AuthenticatorKind>,
    action: Option<Action>,
    potential_errors: Vec<Arc<ErrorDef>>,
}

impl AuthenticatorBuilder {
    /// Creates a new authenticator builder.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
            kind: None,
            action: None,
            potential_errors: Vec::new(),
        }
    }

    /// Sets the authenticator description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the authenticator kind.
    #[must_use]
    pub fn kind(mut self, kind: AuthenticatorKind) -> Self {
        self.kind = Some(kind);
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

    /// Declares an error this authenticator may emit.
    #[must_use]
    pub fn potential_error(mut self, error: Arc<ErrorDef>) -> Self {
        self.potential_errors.push(error);
        self
    }

    /// Builds the authenticator definition.
    #[must_use]
    pub fn build(self) -> Arc<AuthenticatorDef> {
        Arc::new(AuthenticatorDef {
            id: self.id,
            description: self.description,
            kind: self.kind,
            action: self.action,
            potential_errors: self.potential_errors,
        })
    }
}
