//! Full-surface test: declare an API, execute requests against it, and
//! render its schema document.

use delphi::prelude::*;
use http::{Method, StatusCode};
use serde_json::json;
use std::sync::Arc;

/// A small time API: one endpoint returning a formatted time, one endpoint
/// echoing request details, guarded by a bearer authenticator at the API
/// level.
fn time_api() -> Arc<ApiDef> {
    let unauthorized = ErrorDef::builder("unauthorized")
        .description("The token was missing or invalid")
        .http_status(StatusCode::UNAUTHORIZED)
        .build();

    let authenticator = AuthenticatorDef::builder("main_auth")
        .kind(AuthenticatorKind::Bearer)
        .potential_error(unauthorized)
        .action(|_req, res| {
            res.add_header("x-authenticated", "true");
            Ok(())
        })
        .build();

    let zone = EnumDef::builder("zone").value("utc").value("local").build();

    let format = EndpointDef::builder("format")
        .description("Formats the supplied time")
        .method(Method::POST)
        .argument(ArgumentDef::builder("time", TypeRef::timestamp()).required(true).build())
        .argument(ArgumentDef::builder("zone", zone).build())
        .field(FieldDef::builder("time", TypeRef::string()).build())
        .action(|req, res| {
            let time = req
                .arguments()
                .and_then(|args| args.get("time"))
                .and_then(ArgumentValue::as_str)
                .ok_or_else(|| ExecutionError::runtime("time argument missing"))?
                .to_string();
            res.add_field("time", time);
            Ok(())
        })
        .build();

    let controller = ControllerDef::builder("time").endpoint(format).build();

    ApiDef::builder("core_api")
        .controller(controller)
        .authenticator(authenticator)
        .build()
}

fn request_to(api: &Arc<ApiDef>, endpoint: &str, body: serde_json::Value) -> Request {
    let controller = api.controller("time").unwrap().clone();
    let endpoint = controller.endpoint(endpoint).unwrap().clone();
    Request::builder()
        .method(Method::POST)
        .api(api.clone())
        .controller(controller)
        .endpoint(endpoint)
        .body(body)
        .build()
}

#[test]
fn executes_a_declared_endpoint_end_to_end() {
    let api = time_api();
    let mut request = request_to(&api, "format", json!({"time": "2024-06-01T12:00:00Z"}));

    let response = execute(&mut request);
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.header("x-authenticated"), Some("true"));
    let time = response.body().unwrap()["time"].as_str().unwrap();
    assert!(time.starts_with("2024-06-01T12:00:00"));
}

#[test]
fn rejects_unparseable_input_with_the_path() {
    let api = time_api();
    let mut request = request_to(&api, "format", json!({"time": "half past three"}));

    let response = execute(&mut request);
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.body().unwrap();
    assert_eq!(body["error"]["code"], "invalid_argument");
    assert_eq!(body["error"]["detail"]["issue"], "parse_error");
    assert_eq!(body["error"]["detail"]["path"], "time");
}

#[test]
fn the_schema_is_clean_and_renders_every_definition_once() {
    let api = time_api();
    assert!(validate_all(&api).is_empty());

    let doc = render(&api, &RenderOptions::new("api.example.com", "v1"));
    assert_eq!(doc.api, "core_api");

    let json = serde_json::to_value(&doc).unwrap();
    let objects = json["objects"].as_array().unwrap();

    let count = |kind: &str, id: &str| {
        objects
            .iter()
            .filter(|o| o["kind"] == kind && o["id"] == id)
            .count()
    };
    assert_eq!(count("api", "core_api"), 1);
    assert_eq!(count("authenticator", "main_auth"), 1);
    assert_eq!(count("endpoint", "format"), 1);
    assert_eq!(count("enum", "zone"), 1);
    assert_eq!(count("scalar", "timestamp"), 1);
    assert_eq!(count("error", "unauthorized"), 1);
}
