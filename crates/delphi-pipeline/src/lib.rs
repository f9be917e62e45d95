//! # Delphi Pipeline
//!
//! The request-execution pipeline for the Delphi API framework.
//!
//! A raw request enters with resolved API/controller/endpoint references
//! (routing is the transport adapter's job). The pipeline authenticates it
//! through the cascading authenticator resolution ([`auth`]), parses its
//! arguments against the endpoint's declared input type, invokes the
//! endpoint action, and converts any structured error into the stable error
//! body ([`executor`]).

#![doc(html_root_url = "https://docs.rs/delphi-pipeline/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod executor;

pub use auth::{authenticate, resolve};
pub use executor::{execute, Execution, Phase};
