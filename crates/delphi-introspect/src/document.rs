//! Schema document rendering.
//!
//! Rendering turns a collated [`ObjectSet`] into a serializable
//! [`SchemaDocument`]: one record per definition kind, with type references
//! carried by name. The document shape is a stable contract for
//! documentation and codegen consumers.

use crate::collator::{ObjectSet, SchemaNode};
use delphi_core::api::ApiDef;
use delphi_core::argument::ArgumentDef;
use delphi_core::field::FieldDef;
use serde::Serialize;
use std::sync::Arc;

/// The version of the schema document shape this crate renders.
pub const SCHEMA_VERSION: u32 = 1;

/// Options for rendering a schema document.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// The host the API is served from.
    pub host: String,
    /// The namespace (mount point) the API is served under.
    pub namespace: String,
}

impl RenderOptions {
    /// Creates render options.
    #[must_use]
    pub fn new(host: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            namespace: namespace.into(),
        }
    }
}

/// A rendered, serializable schema document.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaDocument {
    /// The document shape version.
    pub schema_version: u32,
    /// The host the API is served from.
    pub host: String,
    /// The namespace the API is served under.
    pub namespace: String,
    /// The API identity.
    pub api: String,
    /// One record per reachable definition.
    pub objects: Vec<ObjectEntry>,
}

/// A rendered definition record.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectEntry {
    /// An API root.
    Api {
        /// Definition identity.
        id: String,
        /// Human-readable name; the identity when no label is declared.
        name: String,
        /// Definition description.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// The API-wide authenticator, by name.
        #[serde(skip_serializing_if = "Option::is_none")]
        authenticator: Option<String>,
        /// The controllers, by name.
        controllers: Vec<String>,
    },
    /// A controller.
    Controller {
        /// Definition identity.
        id: String,
        /// Human-readable name; the identity when no label is declared.
        name: String,
        /// Definition description.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// The controller-level authenticator, by name.
        #[serde(skip_serializing_if = "Option::is_none")]
        authenticator: Option<String>,
        /// The endpoints, by name.
        endpoints: Vec<String>,
    },
    /// An endpoint.
    Endpoint {
        /// Definition identity.
        id: String,
        /// Human-readable name; the label when one is declared.
        name: String,
        /// Definition description.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// The HTTP method hint.
        http_method: String,
        /// The input argument set, by name.
        argument_set: String,
        /// The declared output fields.
        fields: Vec<FieldEntry>,
        /// The declared potential errors, by code.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        potential_errors: Vec<String>,
        /// The endpoint-level authenticator, by name.
        #[serde(skip_serializing_if = "Option::is_none")]
        authenticator: Option<String>,
    },
    /// An authenticator.
    Authenticator {
        /// Definition identity.
        id: String,
        /// Human-readable name; the identity when no label is declared.
        name: String,
        /// Definition description.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// The authenticator kind, when declared.
        #[serde(skip_serializing_if = "Option::is_none")]
        auth_kind: Option<String>,
        /// The declared potential errors, by code.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        potential_errors: Vec<String>,
    },
    /// A declared error.
    Error {
        /// The error code.
        id: String,
        /// Human-readable name; the code.
        name: String,
        /// The error description.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// The HTTP status responses carrying this error use.
        http_status: u16,
        /// The structured detail fields.
        fields: Vec<FieldEntry>,
    },
    /// A scalar type.
    Scalar {
        /// Definition identity.
        id: String,
        /// Human-readable name; the identity.
        name: String,
        /// Definition description.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// An enum type.
    Enum {
        /// Definition identity.
        id: String,
        /// Human-readable name; the identity.
        name: String,
        /// Definition description.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// The declared values in order.
        values: Vec<String>,
    },
    /// An argument-set type.
    ArgumentSet {
        /// Definition identity.
        id: String,
        /// Human-readable name; the identity.
        name: String,
        /// Definition description.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// The declared arguments.
        arguments: Vec<ArgumentEntry>,
    },
    /// An object type.
    Object {
        /// Definition identity.
        id: String,
        /// Human-readable name; the identity.
        name: String,
        /// Definition description.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// The declared fields.
        fields: Vec<FieldEntry>,
    },
}

/// A rendered field, with its type carried by name.
#[derive(Debug, Clone, Serialize)]
pub struct FieldEntry {
    /// The field name.
    pub name: String,
    /// The field's type, by name.
    #[serde(rename = "type")]
    pub type_id: String,
    /// Whether the field may be null.
    pub null: bool,
    /// Whether the field is array-valued.
    pub array: bool,
}

/// A rendered argument, with its type carried by name.
#[derive(Debug, Clone, Serialize)]
pub struct ArgumentEntry {
    /// The argument name.
    pub name: String,
    /// The argument's type, by name.
    #[serde(rename = "type")]
    pub type_id: String,
    /// Whether the argument must be present.
    pub required: bool,
    /// Whether the argument is array-valued.
    pub array: bool,
}

impl From<&FieldDef> for FieldEntry {
    fn from(field: &FieldDef) -> Self {
        Self {
            name: field.name().to_string(),
            type_id: field.type_ref().id().to_string(),
            null: field.null(),
            array: field.array(),
        }
    }
}

impl From<&ArgumentDef> for ArgumentEntry {
    fn from(argument: &ArgumentDef) -> Self {
        Self {
            name: argument.name().to_string(),
            type_id: argument.type_ref().id().to_string(),
            required: argument.required(),
            array: argument.array(),
        }
    }
}

/// Renders the schema document for an API.
///
/// The document lists every definition reachable from the API exactly once,
/// in discovery order.
#[must_use]
pub fn render(api: &Arc<ApiDef>, options: &RenderOptions) -> SchemaDocument {
    let set = ObjectSet::collate(api);
    SchemaDocument {
        schema_version: SCHEMA_VERSION,
        host: options.host.clone(),
        namespace: options.namespace.clone(),
        api: api.id().to_string(),
        objects: set.iter().map(entry_for).collect(),
    }
}

fn entry_for(node: &SchemaNode) -> ObjectEntry {
    match node {
        SchemaNode::Api(def) => ObjectEntry::Api {
            id: def.id().to_string(),
            name: def.id().to_string(),
            description: def.description().map(ToString::to_string),
            authenticator: def.authenticator().map(|a| a.id().to_string()),
            controllers: def.controllers().keys().cloned().collect(),
        },
        SchemaNode::Controller(def) => ObjectEntry::Controller {
            id: def.id().to_string(),
            name: def.id().to_string(),
            description: def.description().map(ToString::to_string),
            authenticator: def.authenticator().map(|a| a.id().to_string()),
            endpoints: def.endpoints().keys().cloned().collect(),
        },
        SchemaNode::Endpoint(def) => ObjectEntry::Endpoint {
            id: def.id().to_string(),
            name: def.label().unwrap_or(def.id()).to_string(),
            description: def.description().map(ToString::to_string),
            http_method: def.method().to_string(),
            argument_set: def.arguments().id().to_string(),
            fields: def.fields().iter().map(FieldEntry::from).collect(),
            potential_errors: def
                .potential_errors()
                .iter()
                .map(|e| e.code().to_string())
                .collect(),
            authenticator: def.authenticator().map(|a| a.id().to_string()),
        },
        SchemaNode::Authenticator(def) => ObjectEntry::Authenticator {
            id: def.id().to_string(),
            name: def.id().to_string(),
            description: def.description().map(ToString::to_string),
            auth_kind: def.kind().map(|k| k.as_str().to_string()),
            potential_errors: def
                .potential_errors()
                .iter()
                .map(|e| e.code().to_string())
                .collect(),
        },
        SchemaNode::Error(def) => ObjectEntry::Error {
            id: def.code().to_string(),
            name: def.code().to_string(),
            description: def.description().map(ToString::to_string),
            http_status: def.http_status().as_u16(),
            fields: def.fields().iter().map(FieldEntry::from).collect(),
        },
        SchemaNode::Scalar(def) => ObjectEntry::Scalar {
            id: def.id().to_string(),
            name: def.id().to_string(),
            description: def.description().map(ToString::to_string),
        },
        SchemaNode::Enum(def) => ObjectEntry::Enum {
            id: def.id().to_string(),
            name: def.id().to_string(),
            description: def.description().map(ToString::to_string),
            values: def.values().iter().cloned().collect(),
        },
        SchemaNode::ArgumentSet(def) => ObjectEntry::ArgumentSet {
            id: def.id().to_string(),
            name: def.id().to_string(),
            description: def.description().map(ToString::to_string),
            arguments: def.arguments().values().map(ArgumentEntry::from).collect(),
        },
        SchemaNode::Object(def) => ObjectEntry::Object {
            id: def.id().to_string(),
            name: def.id().to_string(),
            description: def.description().map(ToString::to_string),
            fields: def.fields().iter().map(FieldEntry::from).collect(),
        },
    }
}
