//! Type references.
//!
//! A [`TypeRef`] is a fully resolved reference to a leaf or composite type.
//! Builders only accept resolved references; there is no name-based registry
//! lookup at request time. The constructors on this type cover the built-in
//! scalar set.

use crate::argument_set::ArgumentSetDef;
use crate::enums::EnumDef;
use crate::object::ObjectDef;
use crate::scalar::{builtin, ScalarDef};
use std::fmt;
use std::sync::Arc;

/// A resolved reference to a schema type.
#[derive(Clone)]
pub enum TypeRef {
    /// A scalar leaf type.
    Scalar(Arc<ScalarDef>),
    /// An enum leaf type.
    Enum(Arc<EnumDef>),
    /// A composite input type.
    ArgumentSet(Arc<ArgumentSetDef>),
    /// A composite output type.
    Object(Arc<ObjectDef>),
}

impl TypeRef {
    /// The built-in string scalar.
    #[must_use]
    pub fn string() -> Self {
        Self::Scalar(builtin::string())
    }

    /// The built-in integer scalar.
    #[must_use]
    pub fn integer() -> Self {
        Self::Scalar(builtin::integer())
    }

    /// The built-in boolean scalar.
    #[must_use]
    pub fn boolean() -> Self {
        Self::Scalar(builtin::boolean())
    }

    /// The built-in decimal scalar.
    #[must_use]
    pub fn decimal() -> Self {
        Self::Scalar(builtin::decimal())
    }

    /// The built-in timestamp scalar.
    #[must_use]
    pub fn timestamp() -> Self {
        Self::Scalar(builtin::timestamp())
    }

    /// Returns the identity of the referenced type.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Scalar(def) => def.id(),
            Self::Enum(def) => def.id(),
            Self::ArgumentSet(def) => def.id(),
            Self::Object(def) => def.id(),
        }
    }

    /// Returns the kind of the referenced type as a stable name.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Enum(_) => "enum",
            Self::ArgumentSet(_) => "argument_set",
            Self::Object(_) => "object",
        }
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef::{}({})", self.kind(), self.id())
    }
}

impl From<Arc<ScalarDef>> for TypeRef {
    fn from(def: Arc<ScalarDef>) -> Self {
        Self::Scalar(def)
    }
}

impl From<Arc<EnumDef>> for TypeRef {
    fn from(def: Arc<EnumDef>) -> Self {
        Self::Enum(def)
    }
}

impl From<Arc<ArgumentSetDef>> for TypeRef {
    fn from(def: Arc<ArgumentSetDef>) -> Self {
        Self::ArgumentSet(def)
    }
}

impl From<Arc<ObjectDef>> for TypeRef {
    fn from(def: Arc<ObjectDef>) -> Self {
        Self::Object(def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_constructors() {
        assert_eq!(TypeRef::string().id(), "string");
        assert_eq!(TypeRef::integer().id(), "integer");
        assert_eq!(TypeRef::boolean().id(), "boolean");
        assert_eq!(TypeRef::decimal().id(), "decimal");
        assert_eq!(TypeRef::timestamp().id(), "timestamp");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(TypeRef::string().kind(), "scalar");
        let state = crate::enums::EnumDef::builder("state").value("active").build();
        assert_eq!(TypeRef::from(state).kind(), "enum");
    }
}
