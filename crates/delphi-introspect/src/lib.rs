//! # Delphi Introspect
//!
//! Schema introspection for the Delphi API framework: the deduplicating
//! collation traversal over the definition graph ([`collator`]), the
//! serializable schema document it renders to ([`document`]), and
//! schema-wide definition validation ([`validate`]).

#![doc(html_root_url = "https://docs.rs/delphi-introspect/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod collator;
pub mod document;
pub mod validate;

pub use collator::{NodeKind, ObjectKey, ObjectSet, SchemaNode};
pub use document::{render, ObjectEntry, RenderOptions, SchemaDocument, SCHEMA_VERSION};
pub use validate::validate_all;
