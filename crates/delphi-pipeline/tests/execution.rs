//! End-to-end tests for the endpoint execution pipeline.

use delphi_core::api::ApiDef;
use delphi_core::argument::ArgumentDef;
use delphi_core::argument_set::{ArgumentSetDef, ArgumentValue};
use delphi_core::authenticator::{AuthenticatorDef, AuthenticatorKind};
use delphi_core::controller::ControllerDef;
use delphi_core::endpoint::EndpointDef;
use delphi_core::error::ExecutionError;
use delphi_core::error_def::ErrorDef;
use delphi_core::field::FieldDef;
use delphi_core::request::Request;
use delphi_core::types::TypeRef;
use delphi_pipeline::{execute, Execution, Phase};
use http::{Method, StatusCode};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Builds a one-endpoint request around the given endpoint, optionally with
/// controller- and API-level authenticators.
fn request_for(
    endpoint: Arc<EndpointDef>,
    controller_auth: Option<Arc<AuthenticatorDef>>,
    api_auth: Option<Arc<AuthenticatorDef>>,
    body: Option<Value>,
) -> Request {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let mut controller = ControllerDef::builder("tests").endpoint(endpoint.clone());
    if let Some(auth) = controller_auth {
        controller = controller.authenticator(auth);
    }
    let controller = controller.build();

    let mut api = ApiDef::builder("example_api").controller(controller.clone());
    if let Some(auth) = api_auth {
        api = api.authenticator(auth);
    }
    let api = api.build();

    let mut builder = Request::builder()
        .method(Method::POST)
        .api(api)
        .controller(controller)
        .endpoint(endpoint);
    if let Some(body) = body {
        builder = builder.body(body);
    }
    builder.build()
}

fn header_auth(id: &str, value: &'static str) -> Arc<AuthenticatorDef> {
    AuthenticatorDef::builder(id)
        .kind(AuthenticatorKind::Bearer)
        .action(move |_req, res| {
            res.add_header("x-auth", value);
            Ok(())
        })
        .build()
}

// ==================== Authenticators ====================

#[test]
fn endpoint_authenticator_wins_over_controller_and_api() {
    let endpoint = EndpointDef::builder("test")
        .authenticator(header_auth("endpoint_auth", "endpoint"))
        .action(|_req, _res| Ok(()))
        .build();
    let mut request = request_for(
        endpoint,
        Some(header_auth("controller_auth", "controller")),
        Some(header_auth("api_auth", "api")),
        None,
    );

    let response = execute(&mut request);
    assert_eq!(response.header("x-auth"), Some("endpoint"));
}

#[test]
fn controller_authenticator_runs_without_endpoint_override() {
    let endpoint = EndpointDef::builder("test").action(|_req, _res| Ok(())).build();
    let mut request = request_for(
        endpoint,
        Some(header_auth("controller_auth", "controller")),
        Some(header_auth("api_auth", "api")),
        None,
    );

    let response = execute(&mut request);
    assert_eq!(response.header("x-auth"), Some("controller"));
}

#[test]
fn api_authenticator_runs_as_the_fallback() {
    let endpoint = EndpointDef::builder("test").action(|_req, _res| Ok(())).build();
    let mut request = request_for(endpoint, None, Some(header_auth("api_auth", "api")), None);

    let response = execute(&mut request);
    assert_eq!(response.header("x-auth"), Some("api"));
}

#[test]
fn no_authenticator_proceeds_to_argument_parsing() {
    let endpoint = EndpointDef::builder("test")
        .argument(ArgumentDef::builder("name", TypeRef::string()).build())
        .action(|_req, _res| Ok(()))
        .build();
    let mut request = request_for(endpoint, None, None, Some(json!({"name": "Phillip"})));

    let response = execute(&mut request);
    assert_eq!(response.status(), StatusCode::OK);
    assert!(request.arguments().is_some());
}

#[test]
fn rejection_from_an_authenticator_stops_the_run() {
    let unauthorized = ErrorDef::builder("unauthorized")
        .description("Invalid or missing token")
        .http_status(StatusCode::UNAUTHORIZED)
        .build();
    let rejecting = AuthenticatorDef::builder("strict_auth")
        .kind(AuthenticatorKind::Bearer)
        .potential_error(unauthorized.clone())
        .action(move |_req, _res| Err(ExecutionError::declared(unauthorized.clone())))
        .build();

    let endpoint = EndpointDef::builder("test")
        .authenticator(rejecting)
        .action(|_req, res| {
            res.add_header("x-action", "ran");
            Ok(())
        })
        .build();
    let mut request = request_for(endpoint, None, None, None);

    let response = execute(&mut request);
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.body().unwrap()["error"]["code"], "unauthorized");
    // The action never ran and the arguments were never parsed.
    assert_eq!(response.header("x-action"), None);
    assert!(request.arguments().is_none());
}

// ==================== Arguments ====================

#[test]
fn arguments_are_built_onto_the_request() {
    let endpoint = EndpointDef::builder("test")
        .argument(ArgumentDef::builder("name", TypeRef::string()).build())
        .action(|_req, _res| Ok(()))
        .build();
    let mut request = request_for(endpoint, None, None, Some(json!({"name": "Phillip"})));

    execute(&mut request);
    let arguments = request.arguments().expect("arguments should be attached");
    assert_eq!(arguments.get("name").and_then(ArgumentValue::as_str), Some("Phillip"));
}

#[test]
fn missing_required_argument_produces_a_400() {
    let endpoint = EndpointDef::builder("test")
        .argument(ArgumentDef::builder("name", TypeRef::string()).required(true).build())
        .action(|_req, _res| Ok(()))
        .build();
    let mut request = request_for(endpoint, None, None, Some(json!({})));

    let response = execute(&mut request);
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.body().unwrap();
    assert_eq!(body["error"]["code"], "missing_required_argument");
    assert_eq!(body["error"]["detail"]["argument"], "name");
}

#[test]
fn nested_parse_failures_carry_the_full_path() {
    let inner = ArgumentSetDef::builder("schedule")
        .argument(ArgumentDef::builder("starts_at", TypeRef::timestamp()).build())
        .build();
    let endpoint = EndpointDef::builder("test")
        .argument(ArgumentDef::builder("schedule", inner).build())
        .action(|_req, _res| Ok(()))
        .build();
    let mut request = request_for(
        endpoint,
        None,
        None,
        Some(json!({"schedule": {"starts_at": "yesterday-ish"}})),
    );

    let response = execute(&mut request);
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.body().unwrap();
    assert_eq!(body["error"]["code"], "invalid_argument");
    assert_eq!(body["error"]["detail"]["issue"], "parse_error");
    assert_eq!(body["error"]["detail"]["path"], "schedule.starts_at");
}

#[test]
fn body_is_preferred_over_params_for_arguments() {
    let endpoint = EndpointDef::builder("test")
        .argument(ArgumentDef::builder("name", TypeRef::string()).build())
        .action(|_req, _res| Ok(()))
        .build();
    let controller = ControllerDef::builder("tests").endpoint(endpoint.clone()).build();
    let api = ApiDef::builder("example_api").controller(controller.clone()).build();
    let mut request = Request::builder()
        .api(api)
        .controller(controller)
        .endpoint(endpoint)
        .param("name", "from_params")
        .body(json!({"name": "from_body"}))
        .build();

    execute(&mut request);
    let arguments = request.arguments().unwrap();
    assert_eq!(arguments.get("name").and_then(ArgumentValue::as_str), Some("from_body"));
}

// ==================== Actions & serialization ====================

#[test]
fn action_fields_are_rendered_through_declared_output_fields() {
    let endpoint = EndpointDef::builder("now")
        .field(FieldDef::builder("time", TypeRef::string()).build())
        .action(|_req, res| {
            res.add_field("time", "2024-06-01T12:00:00Z");
            res.add_field("undeclared", "dropped");
            Ok(())
        })
        .build();
    let mut request = request_for(endpoint, None, None, None);

    let response = execute(&mut request);
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.body().unwrap(),
        &json!({"time": "2024-06-01T12:00:00Z"})
    );
}

#[test]
fn explicit_body_bypasses_field_generation() {
    let endpoint = EndpointDef::builder("test")
        .field(FieldDef::builder("ignored", TypeRef::string()).build())
        .action(|_req, res| {
            res.set_body(json!({"hello": "world"}));
            Ok(())
        })
        .build();
    let mut request = request_for(endpoint, None, None, None);

    let response = execute(&mut request);
    assert_eq!(response.body().unwrap()["hello"], "world");
}

#[test]
fn actions_can_read_parsed_arguments() {
    let endpoint = EndpointDef::builder("greet")
        .argument(ArgumentDef::builder("name", TypeRef::string()).required(true).build())
        .field(FieldDef::builder("greeting", TypeRef::string()).build())
        .action(|req, res| {
            let name = req
                .arguments()
                .and_then(|args| args.get("name"))
                .and_then(ArgumentValue::as_str)
                .ok_or_else(|| ExecutionError::runtime("arguments not available"))?
                .to_string();
            res.add_field("greeting", format!("Hello, {name}!"));
            Ok(())
        })
        .build();
    let mut request = request_for(endpoint, None, None, Some(json!({"name": "Ada"})));

    let response = execute(&mut request);
    assert_eq!(response.body().unwrap()["greeting"], "Hello, Ada!");
}

// ==================== Errors ====================

#[test]
fn declared_errors_map_to_their_status_and_code() {
    let not_found = ErrorDef::builder("not_found")
        .description("The requested resource does not exist")
        .http_status(StatusCode::NOT_FOUND)
        .field(FieldDef::builder("resource", TypeRef::string()).build())
        .build();

    let raised = not_found.clone();
    let endpoint = EndpointDef::builder("show")
        .potential_error(not_found)
        .action(move |_req, _res| {
            let mut fields = Map::new();
            fields.insert("resource".to_string(), json!("user"));
            Err(ExecutionError::declared_with_fields(raised.clone(), fields))
        })
        .build();
    let mut request = request_for(endpoint, None, None, None);

    let response = execute(&mut request);
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response.body().unwrap();
    assert_eq!(body["error"]["code"], "not_found");
    assert_eq!(body["error"]["detail"], json!({"resource": "user"}));
}

#[test]
fn runtime_errors_in_the_authenticator_are_caught() {
    let failing = AuthenticatorDef::builder("my_authentication")
        .kind(AuthenticatorKind::Bearer)
        .action(|_req, _res| Err(ExecutionError::runtime("My example message")))
        .build();
    let endpoint = EndpointDef::builder("test").action(|_req, _res| Ok(())).build();
    let mut request = request_for(endpoint, None, Some(failing), None);

    let response = execute(&mut request);
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.body().unwrap();
    assert_eq!(body["error"]["code"], "generic_runtime_error");
    assert_eq!(body["error"]["description"], "My example message");
    assert_eq!(body["error"]["detail"]["class"], "RuntimeError");
}

#[test]
fn runtime_errors_in_the_action_are_caught() {
    let endpoint = EndpointDef::builder("test")
        .action(|_req, _res| Err(ExecutionError::runtime("My example endpoint message")))
        .build();
    let mut request = request_for(endpoint, None, None, None);

    let response = execute(&mut request);
    let body = response.body().unwrap();
    assert_eq!(body["error"]["code"], "generic_runtime_error");
    assert_eq!(body["error"]["description"], "My example endpoint message");
}

#[test]
fn an_endpoint_without_an_action_degrades_to_the_runtime_catch_all() {
    let endpoint = EndpointDef::builder("test").build();
    let mut request = request_for(endpoint, None, None, None);

    let response = execute(&mut request);
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body().unwrap()["error"]["code"], "generic_runtime_error");
}

// ==================== Phases ====================

#[test]
fn a_successful_run_ends_in_done() {
    let endpoint = EndpointDef::builder("test").action(|_req, _res| Ok(())).build();
    let mut request = request_for(endpoint, None, None, None);

    let mut execution = Execution::new();
    execution.run(&mut request);
    assert_eq!(execution.phase(), Phase::Done);
}

#[test]
fn a_failed_run_ends_in_errored() {
    let endpoint = EndpointDef::builder("test")
        .argument(ArgumentDef::builder("name", TypeRef::string()).required(true).build())
        .action(|_req, _res| Ok(()))
        .build();
    let mut request = request_for(endpoint, None, None, Some(json!({})));

    let mut execution = Execution::new();
    let response = execution.run(&mut request);
    assert_eq!(execution.phase(), Phase::Errored);
    // The error body is still a serialized body.
    assert!(response.body().is_some());
}
