//! # Delphi
//!
//! **Declarative API schema and execution framework**
//!
//! Delphi lets a service author declare an API surface (controllers,
//! endpoints, typed arguments, response fields, authenticators and errors)
//! as structured metadata, then:
//!
//! - **Execute** inbound requests against that metadata: cascading
//!   authenticator resolution, recursive argument parsing with path-tracked
//!   error attribution, action invocation and structured error capture.
//! - **Introspect** the metadata back out as a machine-readable schema
//!   document for documentation and codegen consumers.
//!
//! Transport, routing and authentication mechanisms are deliberately out of
//! scope: the surrounding adapter hands the pipeline a resolved
//! `{ method, body, params }` triple and receives
//! `{ status, headers, body }` back.
//!
//! ## Quick Start
//!
//! ```
//! use delphi::prelude::*;
//! use serde_json::json;
//!
//! let endpoint = EndpointDef::builder("greet")
//!     .argument(ArgumentDef::builder("name", TypeRef::string()).required(true).build())
//!     .field(FieldDef::builder("greeting", TypeRef::string()).build())
//!     .action(|req, res| {
//!         let name = req
//!             .arguments()
//!             .and_then(|args| args.get("name"))
//!             .and_then(ArgumentValue::as_str)
//!             .unwrap_or("world")
//!             .to_string();
//!         res.add_field("greeting", format!("Hello, {name}!"));
//!         Ok(())
//!     })
//!     .build();
//!
//! let controller = ControllerDef::builder("greetings").endpoint(endpoint.clone()).build();
//! let api = ApiDef::builder("example_api").controller(controller.clone()).build();
//!
//! let mut request = Request::builder()
//!     .api(api)
//!     .controller(controller)
//!     .endpoint(endpoint)
//!     .body(json!({"name": "Ada"}))
//!     .build();
//!
//! let response = delphi::pipeline::execute(&mut request);
//! assert_eq!(response.body().unwrap()["greeting"], "Hello, Ada!");
//! ```

#![doc(html_root_url = "https://docs.rs/delphi/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use delphi_core as core;

// Re-export the execution pipeline
pub use delphi_pipeline as pipeline;

// Re-export schema introspection
pub use delphi_introspect as introspect;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use delphi::prelude::*;
/// ```
pub mod prelude {
    pub use delphi_core::{
        ApiDef, ArgumentDef, ArgumentIssue, ArgumentSet, ArgumentSetDef, ArgumentValue,
        AuthenticatorDef, AuthenticatorKind, ControllerDef, EndpointDef, EnumDef, ErrorDef,
        ExecutionError, ExecutionResult, FieldDef, FieldSet, ManifestErrors, ObjectDef, Request,
        RequestId, Response, ScalarDef, TypeRef,
    };

    // The execution pipeline
    pub use delphi_pipeline::{execute, Execution, Phase};

    // Schema introspection
    pub use delphi_introspect::{render, validate_all, ObjectSet, RenderOptions, SchemaDocument};
}
