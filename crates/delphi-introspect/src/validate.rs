//! Schema-wide definition validation.
//!
//! Walks every definition reachable from an API (via the collator) and
//! gathers each definition's problems into one [`ManifestErrors`] report.
//! Definition problems are surfaced here, at schema-validation time; they
//! never abort request handling unless the broken definition is actually
//! exercised, in which case the pipeline's runtime catch-all applies.

use crate::collator::{ObjectSet, SchemaNode};
use delphi_core::api::ApiDef;
use delphi_core::manifest::ManifestErrors;
use std::sync::Arc;

/// Validates every definition reachable from an API.
#[must_use]
pub fn validate_all(api: &Arc<ApiDef>) -> ManifestErrors {
    let set = ObjectSet::collate(api);
    let mut errors = ManifestErrors::new();
    for node in set.iter() {
        match node {
            SchemaNode::Api(def) => def.validate(&mut errors),
            SchemaNode::Controller(def) => def.validate(&mut errors),
            SchemaNode::Endpoint(def) => def.validate(&mut errors),
            SchemaNode::Authenticator(def) => def.validate(&mut errors),
            SchemaNode::Error(def) => def.validate(&mut errors),
            SchemaNode::Scalar(def) => def.validate(&mut errors),
            SchemaNode::Enum(def) => def.validate(&mut errors),
            SchemaNode::ArgumentSet(def) => def.validate(&mut errors),
            SchemaNode::Object(def) => def.validate(&mut errors),
        }
    }
    errors
}
