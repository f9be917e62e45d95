//! The endpoint execution state machine.
//!
//! Each request runs through a fixed sequence of phases:
//!
//! ```text
//! Start → Authenticating → ParsingArguments → ExecutingAction → Serializing → Done
//! ```
//!
//! A structured error in any of the first three working phases moves the
//! run to the terminal `Errored` phase: the error is captured, converted to
//! the stable `{ "error": { code, description, detail } }` body with the
//! error's HTTP status, and the response is still serialized: an error
//! body is a normal body.
//!
//! Each run is independent and holds no shared mutable state beyond the
//! read-only definitions, so runs may execute concurrently across worker
//! threads.

use crate::auth;
use delphi_core::error::ExecutionError;
use delphi_core::request::Request;
use delphi_core::response::Response;
use serde_json::Value;

/// The phases of an endpoint execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// The run has not begun.
    Start,
    /// Resolving and invoking the effective authenticator.
    Authenticating,
    /// Building the argument set from the raw request input.
    ParsingArguments,
    /// Invoking the endpoint action.
    ExecutingAction,
    /// Rendering the response body.
    Serializing,
    /// The run finished normally.
    Done,
    /// The run was terminated by a captured error.
    Errored,
}

impl Phase {
    /// Returns the phase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Authenticating => "authenticating",
            Self::ParsingArguments => "parsing_arguments",
            Self::ExecutingAction => "executing_action",
            Self::Serializing => "serializing",
            Self::Done => "done",
            Self::Errored => "errored",
        }
    }

    /// Returns `true` for the two terminal phases.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Errored)
    }

    /// Returns the working phases in execution order.
    #[must_use]
    pub const fn all() -> [Phase; 5] {
        [
            Self::Start,
            Self::Authenticating,
            Self::ParsingArguments,
            Self::ExecutingAction,
            Self::Serializing,
        ]
    }
}

/// A single endpoint execution.
///
/// The struct exists so the current phase can be observed (and logged); a
/// fresh one is created per request.
#[derive(Debug)]
pub struct Execution {
    phase: Phase,
}

impl Execution {
    /// Creates an execution in the `Start` phase.
    #[must_use]
    pub fn new() -> Self {
        Self { phase: Phase::Start }
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Drives the request through every phase and returns the response.
    ///
    /// Every structured error is captured here; nothing propagates past
    /// this boundary.
    pub fn run(&mut self, request: &mut Request) -> Response {
        let endpoint = request.endpoint().clone();
        let mut response = Response::new();

        tracing::debug!(
            request_id = %request.id(),
            endpoint = endpoint.id(),
            method = %request.method(),
            "executing endpoint"
        );

        self.transition(Phase::Authenticating);
        if let Err(error) = auth::authenticate(request, &mut response) {
            return self.fail(response, &error);
        }

        self.transition(Phase::ParsingArguments);
        match endpoint.arguments().build(&request.raw_arguments()) {
            Ok(arguments) => request.attach_arguments(arguments),
            Err(error) => return self.fail(response, &error),
        }

        self.transition(Phase::ExecutingAction);
        if let Err(error) = endpoint.invoke(request, &mut response) {
            return self.fail(response, &error);
        }

        self.transition(Phase::Serializing);
        if response.body().is_none() {
            let source = Value::Object(response.fields().clone());
            let body = endpoint.fields().generate(&source);
            response.set_body(body);
        }

        self.transition(Phase::Done);
        response
    }

    fn transition(&mut self, phase: Phase) {
        tracing::trace!(from = self.phase.name(), to = phase.name(), "phase transition");
        self.phase = phase;
    }

    /// Captures a structured error: the response takes the error's status
    /// and body, and the run ends in the `Errored` phase. Serialization
    /// still occurs; the error body is the body.
    fn fail(&mut self, mut response: Response, error: &ExecutionError) -> Response {
        tracing::debug!(
            phase = self.phase.name(),
            code = error.code(),
            status = %error.http_status(),
            "request errored"
        );
        self.phase = Phase::Errored;
        response.set_status(error.http_status());
        response.set_body(error.to_body());
        response
    }
}

impl Default for Execution {
    fn default() -> Self {
        Self::new()
    }
}

/// Executes a request through a fresh [`Execution`].
pub fn execute(request: &mut Request) -> Response {
    Execution::new().run(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_ordering() {
        assert!(Phase::Start < Phase::Authenticating);
        assert!(Phase::Authenticating < Phase::ParsingArguments);
        assert!(Phase::ParsingArguments < Phase::ExecutingAction);
        assert!(Phase::ExecutingAction < Phase::Serializing);
        assert!(Phase::Serializing < Phase::Done);
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::Start.name(), "start");
        assert_eq!(Phase::Authenticating.name(), "authenticating");
        assert_eq!(Phase::ParsingArguments.name(), "parsing_arguments");
        assert_eq!(Phase::ExecutingAction.name(), "executing_action");
        assert_eq!(Phase::Serializing.name(), "serializing");
        assert_eq!(Phase::Done.name(), "done");
        assert_eq!(Phase::Errored.name(), "errored");
    }

    #[test]
    fn test_terminal_phases() {
        assert!(Phase::Done.is_terminal());
        assert!(Phase::Errored.is_terminal());
        assert!(!Phase::Serializing.is_terminal());
    }

    #[test]
    fn test_new_execution_starts_at_start() {
        assert_eq!(Execution::new().phase(), Phase::Start);
    }
}
