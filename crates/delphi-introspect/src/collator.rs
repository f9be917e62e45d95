//! Schema collation.
//!
//! Collation gathers every definition reachable from an API into an
//! [`ObjectSet`]: a deduplicating traversal over definition handles, keyed
//! by `(kind, id)`. Each definition kind contributes the definitions it
//! references; the visited check happens *before* recursing into a node's
//! references, so mutually-referencing type graphs terminate.
//!
//! The traversal never deep-copies a definition; nodes are cheap `Arc`
//! handles into the schema that was built at process start.

use delphi_core::api::ApiDef;
use delphi_core::argument_set::ArgumentSetDef;
use delphi_core::authenticator::AuthenticatorDef;
use delphi_core::controller::ControllerDef;
use delphi_core::endpoint::EndpointDef;
use delphi_core::enums::EnumDef;
use delphi_core::error_def::ErrorDef;
use delphi_core::object::ObjectDef;
use delphi_core::scalar::ScalarDef;
use delphi_core::types::TypeRef;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// The kinds of definition a schema can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// An API root.
    Api,
    /// A controller.
    Controller,
    /// An endpoint.
    Endpoint,
    /// An authenticator.
    Authenticator,
    /// A declared error.
    Error,
    /// A scalar type.
    Scalar,
    /// An enum type.
    Enum,
    /// An argument-set type.
    ArgumentSet,
    /// An object type.
    Object,
}

impl NodeKind {
    /// Returns the kind as a stable snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Controller => "controller",
            Self::Endpoint => "endpoint",
            Self::Authenticator => "authenticator",
            Self::Error => "error",
            Self::Scalar => "scalar",
            Self::Enum => "enum",
            Self::ArgumentSet => "argument_set",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identity a definition is deduplicated by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    /// The definition kind.
    pub kind: NodeKind,
    /// The definition identity within its kind.
    pub id: String,
}

/// A handle to one definition in the schema graph.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    /// An API root.
    Api(Arc<ApiDef>),
    /// A controller.
    Controller(Arc<ControllerDef>),
    /// An endpoint.
    Endpoint(Arc<EndpointDef>),
    /// An authenticator.
    Authenticator(Arc<AuthenticatorDef>),
    /// A declared error.
    Error(Arc<ErrorDef>),
    /// A scalar type.
    Scalar(Arc<ScalarDef>),
    /// An enum type.
    Enum(Arc<EnumDef>),
    /// An argument-set type.
    ArgumentSet(Arc<ArgumentSetDef>),
    /// An object type.
    Object(Arc<ObjectDef>),
}

impl SchemaNode {
    /// Returns the node's kind.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Api(_) => NodeKind::Api,
            Self::Controller(_) => NodeKind::Controller,
            Self::Endpoint(_) => NodeKind::Endpoint,
            Self::Authenticator(_) => NodeKind::Authenticator,
            Self::Error(_) => NodeKind::Error,
            Self::Scalar(_) => NodeKind::Scalar,
            Self::Enum(_) => NodeKind::Enum,
            Self::ArgumentSet(_) => NodeKind::ArgumentSet,
            Self::Object(_) => NodeKind::Object,
        }
    }

    /// Returns the node's identity within its kind.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Api(def) => def.id(),
            Self::Controller(def) => def.id(),
            Self::Endpoint(def) => def.id(),
            Self::Authenticator(def) => def.id(),
            Self::Error(def) => def.code(),
            Self::Scalar(def) => def.id(),
            Self::Enum(def) => def.id(),
            Self::ArgumentSet(def) => def.id(),
            Self::Object(def) => def.id(),
        }
    }

    /// Returns the key this node is deduplicated by.
    #[must_use]
    pub fn key(&self) -> ObjectKey {
        ObjectKey {
            kind: self.kind(),
            id: self.id().to_string(),
        }
    }

    /// Returns the definitions this node references directly.
    #[must_use]
    pub fn references(&self) -> Vec<SchemaNode> {
        let mut refs = Vec::new();
        match self {
            Self::Api(def) => {
                if let Some(auth) = def.authenticator() {
                    refs.push(Self::Authenticator(auth.clone()));
                }
                for controller in def.controllers().values() {
                    refs.push(Self::Controller(controller.clone()));
                }
            }
            Self::Controller(def) => {
                if let Some(auth) = def.authenticator() {
                    refs.push(Self::Authenticator(auth.clone()));
                }
                for endpoint in def.endpoints().values() {
                    refs.push(Self::Endpoint(endpoint.clone()));
                }
            }
            Self::Endpoint(def) => {
                if let Some(auth) = def.authenticator() {
                    refs.push(Self::Authenticator(auth.clone()));
                }
                refs.push(Self::ArgumentSet(def.arguments().clone()));
                for field in def.fields().iter() {
                    refs.push(Self::from(field.type_ref()));
                }
                for error in def.potential_errors() {
                    refs.push(Self::Error(error.clone()));
                }
            }
            Self::Authenticator(def) => {
                for error in def.potential_errors() {
                    refs.push(Self::Error(error.clone()));
                }
            }
            Self::Error(def) => {
                for field in def.fields().iter() {
                    refs.push(Self::from(field.type_ref()));
                }
            }
            Self::ArgumentSet(def) => {
                for argument in def.arguments().values() {
                    refs.push(Self::from(argument.type_ref()));
                }
            }
            Self::Object(def) => {
                for field in def.fields().iter() {
                    refs.push(Self::from(field.type_ref()));
                }
            }
            Self::Scalar(_) | Self::Enum(_) => {}
        }
        refs
    }
}

impl From<&TypeRef> for SchemaNode {
    fn from(type_ref: &TypeRef) -> Self {
        match type_ref {
            TypeRef::Scalar(def) => Self::Scalar(def.clone()),
            TypeRef::Enum(def) => Self::Enum(def.clone()),
            TypeRef::ArgumentSet(def) => Self::ArgumentSet(def.clone()),
            TypeRef::Object(def) => Self::Object(def.clone()),
        }
    }
}

/// A deduplicated set of every definition reachable from a root.
#[derive(Debug, Default)]
pub struct ObjectSet {
    objects: IndexMap<ObjectKey, SchemaNode>,
}

impl ObjectSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collates every definition reachable from an API.
    #[must_use]
    pub fn collate(api: &Arc<ApiDef>) -> Self {
        let mut set = Self::new();
        set.add(SchemaNode::Api(api.clone()));
        set
    }

    /// Adds a node and, transitively, everything it references.
    ///
    /// The visited check happens before recursion, so reference cycles
    /// terminate.
    pub fn add(&mut self, node: SchemaNode) {
        let key = node.key();
        if self.objects.contains_key(&key) {
            return;
        }
        let references = node.references();
        self.objects.insert(key, node);
        for reference in references {
            self.add(reference);
        }
    }

    /// Returns whether the set contains a definition.
    #[must_use]
    pub fn contains(&self, kind: NodeKind, id: &str) -> bool {
        self.objects.contains_key(&ObjectKey {
            kind,
            id: id.to_string(),
        })
    }

    /// Iterates over the collated nodes in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaNode> {
        self.objects.values()
    }

    /// Returns the number of collated definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if nothing has been collated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delphi_core::argument::ArgumentDef;
    use delphi_core::field::FieldDef;

    fn one_endpoint_api() -> Arc<ApiDef> {
        let endpoint = EndpointDef::builder("now")
            .argument(ArgumentDef::builder("zone", TypeRef::string()).build())
            .field(FieldDef::builder("time", TypeRef::timestamp()).build())
            .build();
        let controller = ControllerDef::builder("time").endpoint(endpoint).build();
        ApiDef::builder("core_api").controller(controller).build()
    }

    #[test]
    fn test_collation_reaches_types_through_endpoints() {
        let set = ObjectSet::collate(&one_endpoint_api());
        assert!(set.contains(NodeKind::Api, "core_api"));
        assert!(set.contains(NodeKind::Controller, "time"));
        assert!(set.contains(NodeKind::Endpoint, "now"));
        assert!(set.contains(NodeKind::ArgumentSet, "now_arguments"));
        assert!(set.contains(NodeKind::Scalar, "string"));
        assert!(set.contains(NodeKind::Scalar, "timestamp"));
    }

    #[test]
    fn test_shared_types_are_deduplicated() {
        let first = EndpointDef::builder("first")
            .field(FieldDef::builder("name", TypeRef::string()).build())
            .build();
        let second = EndpointDef::builder("second")
            .field(FieldDef::builder("title", TypeRef::string()).build())
            .build();
        let controller = ControllerDef::builder("things")
            .endpoint(first)
            .endpoint(second)
            .build();
        let api = ApiDef::builder("api").controller(controller).build();

        let set = ObjectSet::collate(&api);
        let scalars = set
            .iter()
            .filter(|node| node.kind() == NodeKind::Scalar && node.id() == "string")
            .count();
        assert_eq!(scalars, 1);
    }

    #[test]
    fn test_authenticators_and_errors_are_collated() {
        use delphi_core::authenticator::{AuthenticatorDef, AuthenticatorKind};

        let unauthorized = ErrorDef::builder("unauthorized")
            .field(FieldDef::builder("reason", TypeRef::string()).build())
            .build();
        let auth = AuthenticatorDef::builder("main_auth")
            .kind(AuthenticatorKind::Bearer)
            .potential_error(unauthorized)
            .action(|_req, _res| Ok(()))
            .build();
        let endpoint = EndpointDef::builder("now").build();
        let controller = ControllerDef::builder("time").endpoint(endpoint).build();
        let api = ApiDef::builder("api")
            .controller(controller)
            .authenticator(auth)
            .build();

        let set = ObjectSet::collate(&api);
        assert!(set.contains(NodeKind::Authenticator, "main_auth"));
        assert!(set.contains(NodeKind::Error, "unauthorized"));
        // The error's detail fields contribute their types too.
        assert!(set.contains(NodeKind::Scalar, "string"));
    }

    #[test]
    fn test_adding_the_same_node_twice_is_a_noop() {
        let api = one_endpoint_api();
        let mut set = ObjectSet::collate(&api);
        let before = set.len();
        set.add(SchemaNode::Api(api));
        assert_eq!(set.len(), before);
    }
}
