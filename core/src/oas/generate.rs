#![deny(missing_docs)]

//! # Path-Item Generation
//!
//! Expands a compact [`EndpointDetails`] description into a single-path
//! OpenAPI 3.0 document.

use crate::endpoint::HttpMethod;
use crate::oas::models::{DetailParameter, DocumentInfo, EndpointDetails, OpenApiDocument};
use crate::oas::normalization::{normalize_optional, normalize_schema};
use indexmap::IndexMap;
use serde_json::{json, Map, Value};

/// Builds a document with exactly one path and one method.
///
/// `info` falls back to [`DocumentInfo::default`] when not supplied.
pub fn generate_openapi_doc(
    path: &str,
    method: HttpMethod,
    details: &EndpointDetails,
    info: Option<DocumentInfo>,
) -> OpenApiDocument {
    let mut document = OpenApiDocument::empty(info.unwrap_or_default());
    let mut item = IndexMap::new();
    item.insert(
        method.as_lower().to_string(),
        generate_operation(path, method, details),
    );
    document.paths.insert(path.to_string(), item);
    document
}

/// Builds the Operation object for `details`.
pub fn generate_operation(path: &str, method: HttpMethod, details: &EndpointDetails) -> Value {
    let parameters: Vec<Value> = details.parameters.iter().map(parameter_value).collect();
    let response_schema = normalize_schema(details.response_schema.clone());
    let request_schema = normalize_optional(details.request_schema.clone());

    let mut operation = Map::new();
    operation.insert("tags".into(), json!([derive_tag(path)]));
    if let Some(description) = &details.description {
        operation.insert("description".into(), Value::String(description.clone()));
    }
    operation.insert("parameters".into(), Value::Array(parameters));
    operation.insert(
        "responses".into(),
        json!({
            "200": {
                "description": "Successful response",
                "content": json_content(response_schema, details.examples.response.as_ref()),
            }
        }),
    );

    if let Some(schema) = request_schema.filter(|_| method.accepts_request_body()) {
        operation.insert(
            "requestBody".into(),
            json!({ "content": json_content(schema, details.examples.request.as_ref()) }),
        );
    }

    Value::Object(operation)
}

/// `content` map with one `application/json` media type; `example` only when known.
fn json_content(schema: Value, example: Option<&Value>) -> Value {
    let mut media = Map::new();
    media.insert("schema".into(), schema);
    if let Some(example) = example {
        media.insert("example".into(), example.clone());
    }
    json!({ "application/json": media })
}

fn parameter_value(param: &DetailParameter) -> Value {
    let mut out = Map::new();
    out.insert("in".into(), json!(param.location));
    out.insert("name".into(), Value::String(param.name.clone()));
    let schema = normalize_schema(param.schema.clone());
    if !schema.is_null() {
        out.insert("schema".into(), schema);
    }
    if let Some(description) = &param.description {
        out.insert("description".into(), Value::String(description.clone()));
    }
    for (key, value) in &param.extra {
        out.entry(key.clone()).or_insert_with(|| value.clone());
    }
    Value::Object(out)
}

/// Derives a human readable tag from the last path segment.
///
/// `/api/v1/project-users` becomes `Project Users`. An empty last segment
/// (trailing slash, root path) falls back to the whole path.
pub fn derive_tag(path: &str) -> String {
    let segment = match path.rsplit('/').next() {
        Some(last) if !last.is_empty() => last,
        _ => path,
    };
    title_case(&segment.replace('-', " "))
}

/// Upper-cases the first ASCII word character of every word.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        let is_word = c.is_ascii_alphanumeric() || c == '_';
        if is_word && !in_word {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        in_word = is_word;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::models::{Examples, ParameterLocation};
    use pretty_assertions::assert_eq;

    fn details(request_schema: Option<Value>) -> EndpointDetails {
        EndpointDetails {
            examples: Examples {
                request: Some(json!({ "name": "Ada" })),
                response: Some(json!({ "id": 1, "name": "Ada", "nickname": null })),
            },
            parameters: vec![DetailParameter {
                location: ParameterLocation::Query,
                name: "lang".into(),
                schema: json!({ "type": ["string", "null"] }),
                description: Some("Language code".into()),
                extra: Map::new(),
            }],
            description: Some("Creates a user".into()),
            request_schema,
            response_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer" },
                    "nickname": { "type": ["string", "null"] }
                }
            }),
        }
    }

    #[test]
    fn test_tag_derivation() {
        assert_eq!(derive_tag("/api/v1/project-users"), "Project Users");
        assert_eq!(derive_tag("/users"), "Users");
        assert_eq!(derive_tag("/api/v1/user_roles"), "User_roles");
        assert_eq!(derive_tag("/"), "/");
        assert_eq!(derive_tag("/orders/"), "/Orders/");
    }

    #[test]
    fn test_get_never_has_request_body() {
        let doc = generate_openapi_doc(
            "/users",
            HttpMethod::Get,
            &details(Some(json!({ "type": "object" }))),
            None,
        );
        let op = &doc.paths["/users"]["get"];
        assert!(op.get("requestBody").is_none());
    }

    #[test]
    fn test_delete_never_has_request_body() {
        let doc = generate_openapi_doc(
            "/users/1",
            HttpMethod::Delete,
            &details(Some(json!({ "type": "object" }))),
            None,
        );
        assert!(doc.paths["/users/1"]["delete"].get("requestBody").is_none());
    }

    #[test]
    fn test_post_has_request_body_iff_schema() {
        let with = generate_openapi_doc(
            "/users",
            HttpMethod::Post,
            &details(Some(json!({ "type": ["object", "null"] }))),
            None,
        );
        assert_eq!(
            with.paths["/users"]["post"]["requestBody"],
            json!({
                "content": {
                    "application/json": {
                        "schema": { "type": "object", "nullable": true },
                        "example": { "name": "Ada" }
                    }
                }
            })
        );

        let without = generate_openapi_doc("/users", HttpMethod::Post, &details(None), None);
        assert!(without.paths["/users"]["post"].get("requestBody").is_none());
    }

    #[test]
    fn test_full_operation_shape() {
        let doc = generate_openapi_doc("/api/project-users", HttpMethod::Put, &details(None), None);

        assert_eq!(doc.openapi, "3.0.3");
        assert_eq!(doc.info, DocumentInfo::new("API Documentation", "1.0.0"));
        assert_eq!(doc.paths.len(), 1);
        assert_eq!(doc.paths["/api/project-users"].len(), 1);

        let op = &doc.paths["/api/project-users"]["put"];
        assert_eq!(
            *op,
            json!({
                "tags": ["Project Users"],
                "description": "Creates a user",
                "parameters": [{
                    "in": "query",
                    "name": "lang",
                    "schema": { "type": "string", "nullable": true },
                    "description": "Language code"
                }],
                "responses": {
                    "200": {
                        "description": "Successful response",
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "properties": {
                                        "id": { "type": "integer" },
                                        "nickname": { "type": "string", "nullable": true }
                                    }
                                },
                                "example": { "id": 1, "name": "Ada", "nickname": null }
                            }
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_custom_info() {
        let doc = generate_openapi_doc(
            "/users",
            HttpMethod::Get,
            &details(None),
            Some(DocumentInfo::new("Users API", "2.1.0")),
        );
        assert_eq!(doc.info.title, "Users API");
        assert_eq!(doc.info.version, "2.1.0");
    }

    #[test]
    fn test_parameter_without_schema_and_extra_keys() {
        let mut d = details(None);
        let mut extra = Map::new();
        extra.insert("required".into(), json!(true));
        d.parameters = vec![DetailParameter {
            location: ParameterLocation::Path,
            name: "id".into(),
            schema: Value::Null,
            description: None,
            extra,
        }];
        let op = generate_operation("/users/{id}", HttpMethod::Get, &d);
        assert_eq!(
            op["parameters"],
            json!([{ "in": "path", "name": "id", "required": true }])
        );
    }

    #[test]
    fn test_missing_fields_stay_absent() {
        let details: EndpointDetails = serde_json::from_value(json!({
            "response_schema": { "type": "object" },
            "request_schema": { "type": "object" }
        }))
        .unwrap();
        let op = generate_operation("/users", HttpMethod::Post, &details);

        assert!(op.get("description").is_none());
        assert_eq!(
            op["responses"]["200"]["content"]["application/json"],
            json!({ "schema": { "type": "object" } })
        );
        assert_eq!(
            op["requestBody"],
            json!({ "content": { "application/json": { "schema": { "type": "object" } } } })
        );
    }
}
