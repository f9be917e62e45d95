//! Per-request response state.
//!
//! A [`Response`] accumulates status, headers and named field values while a
//! request executes. The final body is either set explicitly by an action
//! (`set_body`) or rendered by the pipeline from the endpoint's declared
//! output fields during the serialization phase.

use http::StatusCode;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// A response under construction.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: IndexMap<String, String>,
    fields: Map<String, Value>,
    body: Option<Value>,
}

impl Response {
    /// Creates an empty 200 response.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: IndexMap::new(),
            fields: Map::new(),
            body: None,
        }
    }

    /// Returns the HTTP status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the HTTP status.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Adds a header. A later header with the same name replaces the
    /// earlier one.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Returns a header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Returns all headers in insertion order.
    #[must_use]
    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    /// Adds a named field value for the serialization phase.
    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Returns the accumulated field values.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Sets the body explicitly, bypassing field generation.
    pub fn set_body(&mut self, body: Value) {
        self.body = Some(body);
    }

    /// Returns the body, if one has been produced.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
