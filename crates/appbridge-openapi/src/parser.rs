//! Spec document -> tool parser.
//!
//! Walks an OpenAPI-shaped [`ToolSpecDocument`] and generates one [`RestApiTool`] per
//! operation, in document order. `$ref` resolution is local-only (`#/...` JSON
//! pointers): the documents consumed here are produced by control-plane spec generation
//! or local synthesis and never reference external files.

use crate::auth::{AuthCredential, AuthScheme};
use crate::document::ToolSpecDocument;
use crate::error::{OpenApiToolError, Result};
use crate::tool::RestApiTool;
use openapiv3::{
    OpenAPI, Operation, Parameter, ParameterSchemaOrContent, PathItem, ReferenceOr, RequestBody,
    Schema,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use tracing::debug;

/// Parse a spec document into tool definitions.
///
/// Tools are returned in the order operations appear in the document (paths in document
/// order, methods in the fixed GET/PUT/POST/DELETE/OPTIONS/HEAD/PATCH/TRACE order). Each
/// tool carries a clone of the supplied scheme/credential pair. A document with zero
/// operations yields an empty vector; that is a valid, non-error outcome.
///
/// # Errors
///
/// Returns an error if the document is not a valid OpenAPI document or a `$ref` inside
/// it cannot be resolved.
pub fn parse_document(
    document: &ToolSpecDocument,
    auth_scheme: &AuthScheme,
    auth_credential: &AuthCredential,
) -> Result<Vec<RestApiTool>> {
    let raw = document.as_value();
    let api: OpenAPI =
        serde_json::from_value(raw.clone()).map_err(OpenApiToolError::InvalidDocument)?;

    let base_url = api.servers.first().map(|s| s.url.clone());
    let mut tools = Vec::new();

    for (path, item_ref) in &api.paths.paths {
        let item = resolve_local::<PathItem>(raw, item_ref)?;

        for (method, operation) in operations_of(&item) {
            let name = tool_name(method, path, operation);
            let description = operation
                .summary
                .clone()
                .or_else(|| operation.description.clone())
                .unwrap_or_else(|| format!("{method} {path}"));
            let input_schema = input_schema_for(raw, &item.parameters, operation)?;

            tools.push(RestApiTool {
                name,
                description,
                method: method.to_string(),
                path: path.clone(),
                base_url: base_url.clone(),
                input_schema,
                auth_scheme: auth_scheme.clone(),
                auth_credential: auth_credential.clone(),
            });
        }
    }

    debug!(tool_count = tools.len(), "parsed spec document into tools");
    Ok(tools)
}

/// Operations of a path item, in a fixed method order.
fn operations_of(item: &PathItem) -> Vec<(&'static str, &Operation)> {
    [
        ("GET", item.get.as_ref()),
        ("PUT", item.put.as_ref()),
        ("POST", item.post.as_ref()),
        ("DELETE", item.delete.as_ref()),
        ("OPTIONS", item.options.as_ref()),
        ("HEAD", item.head.as_ref()),
        ("PATCH", item.patch.as_ref()),
        ("TRACE", item.trace.as_ref()),
    ]
    .into_iter()
    .filter_map(|(m, op)| op.map(|op| (m, op)))
    .collect()
}

fn tool_name(method: &str, path: &str, operation: &Operation) -> String {
    operation
        .operation_id
        .clone()
        .unwrap_or_else(|| generate_canonical_name(method, path))
}

/// Generate a tool name from method + path when the operation has no `operationId`.
///
/// `("get", "/pet/{petId}")` becomes `get_pet_petId`. Any query-string suffix on the
/// path key is ignored.
fn generate_canonical_name(method: &str, path: &str) -> String {
    let path = path.split('?').next().unwrap_or(path);
    let normalized = path
        .trim_start_matches('/')
        .replace('/', "_")
        .replace(['{', '}'], "");
    format!("{}_{normalized}", method.to_lowercase())
}

/// Build the JSON Schema for a tool's input object.
///
/// Path-item parameters come first so operation-level parameters of the same name
/// override them. A JSON request body contributes its object properties directly; a
/// non-object body is exposed as a single `body` property.
fn input_schema_for(
    raw: &Value,
    path_item_params: &[ReferenceOr<Parameter>],
    operation: &Operation,
) -> Result<Value> {
    let mut properties = Map::new();
    let mut required: Vec<String> = Vec::new();

    for param_ref in path_item_params.iter().chain(operation.parameters.iter()) {
        let param = resolve_local::<Parameter>(raw, param_ref)?;
        let data = param.parameter_data_ref();

        let mut schema = match &data.format {
            ParameterSchemaOrContent::Schema(schema_ref) => schema_value(raw, schema_ref)?,
            // Content-typed parameters are rare in generated specs; expose as a string.
            ParameterSchemaOrContent::Content(_) => json!({ "type": "string" }),
        };
        if let (Some(description), Some(obj)) = (&data.description, schema.as_object_mut()) {
            obj.entry("description")
                .or_insert_with(|| Value::String(description.clone()));
        }

        if data.required {
            required.push(data.name.clone());
        }
        properties.insert(data.name.clone(), schema);
    }

    if let Some(body_ref) = &operation.request_body {
        let body = resolve_local::<RequestBody>(raw, body_ref)?;
        if let Some(schema_ref) = body
            .content
            .get("application/json")
            .and_then(|media| media.schema.as_ref())
        {
            let schema = schema_value(raw, schema_ref)?;
            merge_body_schema(&mut properties, &mut required, schema, body.required);
        }
    }

    let mut seen = HashSet::new();
    required.retain(|name| seen.insert(name.clone()));

    Ok(json!({
        "type": "object",
        "properties": properties,
        "required": required,
    }))
}

/// Fold a request body schema into the tool input schema.
fn merge_body_schema(
    properties: &mut Map<String, Value>,
    required: &mut Vec<String>,
    schema: Value,
    body_required: bool,
) {
    let is_object = schema.get("type").and_then(Value::as_str) == Some("object")
        || schema.get("properties").is_some();

    if is_object {
        if let Some(body_props) = schema.get("properties").and_then(Value::as_object) {
            for (name, prop) in body_props {
                properties.insert(name.clone(), prop.clone());
            }
        }
        if let Some(body_required_names) = schema.get("required").and_then(Value::as_array) {
            for name in body_required_names.iter().filter_map(Value::as_str) {
                required.push(name.to_string());
            }
        }
    } else {
        properties.insert("body".to_string(), schema);
        if body_required {
            required.push("body".to_string());
        }
    }
}

fn schema_value(raw: &Value, schema_ref: &ReferenceOr<Schema>) -> Result<Value> {
    let schema = resolve_local::<Schema>(raw, schema_ref)?;
    Ok(serde_json::to_value(schema)?)
}

/// Resolve a local (`#/...`) `$ref` chain against the raw document.
fn resolve_local<T>(raw: &Value, item: &ReferenceOr<T>) -> Result<T>
where
    T: Clone + DeserializeOwned,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut current: ReferenceOr<T> = item.clone();

    loop {
        match current {
            ReferenceOr::Item(value) => return Ok(value),
            ReferenceOr::Reference { reference } => {
                let Some(fragment) = reference.strip_prefix('#') else {
                    return Err(OpenApiToolError::UnsupportedRef {
                        reference,
                        message: "only local '#/...' references are supported".to_string(),
                    });
                };
                if !fragment.starts_with('/') {
                    return Err(OpenApiToolError::UnsupportedRef {
                        reference,
                        message: "expected a JSON pointer starting with '/'".to_string(),
                    });
                }
                if !seen.insert(reference.clone()) {
                    return Err(OpenApiToolError::CyclicRef { reference });
                }

                let target = raw
                    .pointer(fragment)
                    .ok_or_else(|| OpenApiToolError::UnresolvedRef {
                        reference: reference.clone(),
                    })?;
                current = serde_json::from_value(target.clone())?;
            }
        }
    }
}
