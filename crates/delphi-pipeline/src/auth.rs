//! Authenticator resolution and invocation.
//!
//! The effective authenticator for a request is resolved by walking
//! endpoint → controller → API. This is a strict override cascade, not a
//! merge: the first level that declares an authenticator wins outright, and
//! lower-precedence authenticators never run.

use delphi_core::api::ApiDef;
use delphi_core::authenticator::AuthenticatorDef;
use delphi_core::controller::ControllerDef;
use delphi_core::endpoint::EndpointDef;
use delphi_core::error::ExecutionResult;
use delphi_core::request::Request;
use delphi_core::response::Response;
use std::sync::Arc;

/// Resolves the effective authenticator for an endpoint.
#[must_use]
pub fn resolve(
    endpoint: &EndpointDef,
    controller: &ControllerDef,
    api: &ApiDef,
) -> Option<Arc<AuthenticatorDef>> {
    endpoint
        .authenticator()
        .or_else(|| controller.authenticator())
        .or_else(|| api.authenticator())
        .cloned()
}

/// Authenticates a request.
///
/// When an authenticator resolves, its action runs with the request and
/// response; the action may add headers, mutate the response, or reject the
/// request by returning an error. When no authenticator resolves at any
/// level, authentication is trivially successful.
pub fn authenticate(request: &Request, response: &mut Response) -> ExecutionResult<()> {
    match resolve(request.endpoint(), request.controller(), request.api()) {
        Some(authenticator) => {
            tracing::trace!(
                request_id = %request.id(),
                authenticator = authenticator.id(),
                "invoking authenticator"
            );
            authenticator.invoke(request, response)
        }
        None => Ok(()),
    }
}
