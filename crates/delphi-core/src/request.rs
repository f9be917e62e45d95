//! Per-request state.
//!
//! A [`Request`] carries the raw inbound triple (method, body, params), the
//! resolved API/controller/endpoint references, and, once the pipeline has
//! parsed them, the validated arguments. Route resolution itself is the
//! transport adapter's job; the request arrives here already resolved.

use crate::api::ApiDef;
use crate::argument_set::ArgumentSet;
use crate::controller::ControllerDef;
use crate::endpoint::EndpointDef;
use http::Method;
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it suitable for request tracking
/// and log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An inbound request being executed against the schema.
#[derive(Debug, Clone)]
pub struct Request {
    id: RequestId,
    method: Method,
    body: Option<Value>,
    params: Map<String, Value>,
    api: Arc<ApiDef>,
    controller: Arc<ControllerDef>,
    endpoint: Arc<EndpointDef>,
    arguments: Option<ArgumentSet>,
}

impl Request {
    /// Creates a new request builder.
    #[must_use]
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    /// Returns the request ID.
    #[must_use]
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the raw JSON body, if one was supplied.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Returns the raw query/form params.
    #[must_use]
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// Returns the raw input the arguments should be parsed from: the body
    /// when one is present, otherwise the params.
    #[must_use]
    pub fn raw_arguments(&self) -> Value {
        self.body
            .clone()
            .unwrap_or_else(|| Value::Object(self.params.clone()))
    }

    /// Returns the resolved API definition.
    #[must_use]
    pub fn api(&self) -> &Arc<ApiDef> {
        &self.api
    }

    /// Returns the resolved controller definition.
    #[must_use]
    pub fn controller(&self) -> &Arc<ControllerDef> {
        &self.controller
    }

    /// Returns the resolved endpoint definition.
    #[must_use]
    pub fn endpoint(&self) -> &Arc<EndpointDef> {
        &self.endpoint
    }

    /// Returns the validated arguments, once the pipeline has built them.
    #[must_use]
    pub fn arguments(&self) -> Option<&ArgumentSet> {
        self.arguments.as_ref()
    }

    /// Attaches the validated arguments. Called by the pipeline after the
    /// argument-parsing phase succeeds.
    pub fn attach_arguments(&mut self, arguments: ArgumentSet) {
        self.arguments = Some(arguments);
    }
}

/// Builder for [`Request`] values.
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    body: Option<Value>,
    params: Map<String, Value>,
    api: Option<Arc<ApiDef>>,
    controller: Option<Arc<ControllerDef>>,
    endpoint: Option<Arc<EndpointDef>>,
}

impl RequestBuilder {
    /// Sets the HTTP method. Defaults to GET.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the raw JSON body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a single raw param.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Sets the resolved API definition.
    #[must_use]
    pub fn api(mut self, api: Arc<ApiDef>) -> Self {
        self.api = Some(api);
        self
    }

    /// Sets the resolved controller definition.
    #[must_use]
    pub fn controller(mut self, controller: Arc<ControllerDef>) -> Self {
        self.controller = Some(controller);
        self
    }

    /// Sets the resolved endpoint definition.
    #[must_use]
    pub fn endpoint(mut self, endpoint: Arc<EndpointDef>) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Builds the request.
    ///
    /// # Panics
    ///
    /// Panics if the API, controller or endpoint references were not set;
    /// routing must resolve them before a request reaches the pipeline.
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            id: RequestId::new(),
            method: self.method.unwrap_or(Method::GET),
            body: self.body,
            params: self.params,
            api: self.api.expect("api is required"),
            controller: self.controller.expect("controller is required"),
            endpoint: self.endpoint.expect("endpoint is required"),
            arguments: None,
        }
    }
}
