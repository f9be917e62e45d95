//! # Delphi Core
//!
//! Definitions and the type system for the Delphi API framework.
//!
//! This crate provides the foundational pieces used throughout Delphi:
//!
//! - [`ScalarDef`] / [`EnumDef`]: named, reusable leaf types
//! - [`ArgumentDef`] / [`ArgumentSetDef`]: typed input slots and the
//!   recursive parser/validator that turns raw input into a validated
//!   [`ArgumentSet`]
//! - [`FieldDef`] / [`ObjectDef`]: response field shapes
//! - [`ApiDef`] / [`ControllerDef`] / [`EndpointDef`] /
//!   [`AuthenticatorDef`] / [`ErrorDef`]: the metadata containers an API
//!   surface is declared with
//! - [`ExecutionError`]: the request-time error taxonomy
//! - [`Request`] / [`Response`]: per-request state
//!
//! Definitions are built once through append-only builders, frozen behind
//! `Arc`s, and shared read-only across concurrent request pipelines.

#![doc(html_root_url = "https://docs.rs/delphi-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod action;
pub mod api;
pub mod argument;
pub mod argument_set;
pub mod authenticator;
pub mod controller;
pub mod endpoint;
pub mod enums;
pub mod error;
pub mod error_def;
pub mod field;
pub mod manifest;
pub mod object;
pub mod request;
pub mod response;
pub mod scalar;
pub mod types;

pub use action::Action;
pub use api::ApiDef;
pub use argument::ArgumentDef;
pub use argument_set::{ArgumentSet, ArgumentSetDef, ArgumentValue};
pub use authenticator::{AuthenticatorDef, AuthenticatorKind};
pub use controller::ControllerDef;
pub use endpoint::EndpointDef;
pub use enums::EnumDef;
pub use error::{ArgumentIssue, ExecutionError, ExecutionResult};
pub use error_def::ErrorDef;
pub use field::{FieldDef, FieldSet};
pub use manifest::{ManifestErrors, ManifestIssue};
pub use object::ObjectDef;
pub use request::{Request, RequestId};
pub use response::Response;
pub use scalar::{ParseError, ScalarDef};
pub use types::TypeRef;
