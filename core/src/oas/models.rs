#![deny(missing_docs)]

//! # OpenAPI Models
//!
//! The two document shapes a model may return for an endpoint, and the
//! generated document structures.
//!
//! - [`EndpointDetails`]: the compact shape (schemas plus examples). Canonical
//!   for generation; it is expanded into a full operation by the generator.
//! - [`Operation`]: a full OpenAPI Operation object, accepted as is after
//!   validation and schema normalization.

use crate::error::{AppError, AppResult};
use crate::oas::normalization::normalize_schema;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameter location (`in`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Query string parameter.
    Query,
    /// Templated path segment.
    Path,
    /// Request header.
    Header,
    /// Cookie value.
    Cookie,
}

/// Example payloads attached to a compact endpoint description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Examples {
    /// Example request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<Value>,
    /// Example response body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

/// A parameter of the compact shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailParameter {
    /// Location of the parameter.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Parameter name.
    pub name: String,
    /// Schema fragment, possibly absent.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub schema: Value,
    /// Human readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Any other keys the model attached (`required`, `example`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The compact endpoint description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDetails {
    /// Example payloads.
    #[serde(default)]
    pub examples: Examples,
    /// Parameters of the endpoint.
    #[serde(default)]
    pub parameters: Vec<DetailParameter>,
    /// Operation description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Request body schema, if the endpoint takes one.
    #[serde(default)]
    pub request_schema: Option<Value>,
    /// Schema of the successful response.
    pub response_schema: Value,
}

/// `style` values of a Parameter Object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterStyle {
    /// `matrix`
    Matrix,
    /// `label`
    Label,
    /// `form`
    Form,
    /// `simple`
    Simple,
    /// `spaceDelimited`
    SpaceDelimited,
    /// `pipeDelimited`
    PipeDelimited,
    /// `deepObject`
    DeepObject,
}

/// Media Type Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    /// Schema of the payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    /// Single example.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Named examples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<IndexMap<String, Value>>,
    /// Encoding map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<IndexMap<String, Value>>,
}

impl MediaType {
    fn normalized(mut self) -> Self {
        self.schema = self.schema.map(normalize_schema);
        self
    }
}

/// Parameter Object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationParameter {
    /// Parameter name.
    pub name: String,
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the parameter is mandatory.
    #[serde(default)]
    pub required: bool,
    /// Deprecation flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    /// Allows empty values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_empty_value: Option<bool>,
    /// Serialization style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ParameterStyle>,
    /// Explode flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,
    /// Allow reserved characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_reserved: Option<bool>,
    /// Schema of the value. Mutually exclusive with `content`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    /// Single example.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Named examples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<IndexMap<String, Value>>,
    /// Content map. Mutually exclusive with `schema`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<String, MediaType>>,
}

/// Request Body Object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Content map. Required once validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<String, MediaType>>,
    /// Whether the body is mandatory.
    #[serde(default)]
    pub required: bool,
}

/// Response Object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Description.
    pub description: String,
    /// Response headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Map<String, Value>>,
    /// Content map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<String, MediaType>>,
    /// Links to other operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Map<String, Value>>,
}

/// Operation Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Tags for grouping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unique operation id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<OperationParameter>>,
    /// Request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Responses keyed by status code.
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
    /// Deprecation flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    /// Security requirements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<IndexMap<String, Vec<String>>>>,
}

impl Operation {
    /// Checks the constraints serde cannot express.
    pub fn validate(&self) -> AppResult<()> {
        if self.responses.is_empty() {
            return Err(AppError::Generation(
                "Operation must declare at least one response".into(),
            ));
        }
        for param in self.parameters.iter().flatten() {
            if param.schema.is_some() && param.content.is_some() {
                return Err(AppError::Generation(format!(
                    "Parameter '{}' cannot have both 'schema' and 'content'",
                    param.name
                )));
            }
        }
        if let Some(body) = &self.request_body {
            if body.content.is_none() {
                return Err(AppError::Generation(
                    "requestBody must include content if present".into(),
                ));
            }
        }
        Ok(())
    }

    /// Normalizes every schema reachable through media types and parameters.
    pub fn normalized(mut self) -> Self {
        if let Some(params) = self.parameters.as_mut() {
            for param in params.iter_mut() {
                param.schema = param.schema.take().map(normalize_schema);
                if let Some(content) = param.content.take() {
                    param.content = Some(normalize_content(content));
                }
            }
        }
        if let Some(body) = self.request_body.as_mut() {
            if let Some(content) = body.content.take() {
                body.content = Some(normalize_content(content));
            }
        }
        for response in self.responses.values_mut() {
            if let Some(content) = response.content.take() {
                response.content = Some(normalize_content(content));
            }
        }
        self
    }
}

fn normalize_content(content: IndexMap<String, MediaType>) -> IndexMap<String, MediaType> {
    content
        .into_iter()
        .map(|(mime, media)| (mime, media.normalized()))
        .collect()
}

/// A stored endpoint document, in either shape.
///
/// Deserialization tries the compact shape first: it is the only one with a
/// required key (`response_schema`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EndpointDocument {
    /// Compact description, expanded by the generator.
    Details(EndpointDetails),
    /// Full Operation object.
    Operation(Operation),
}

impl EndpointDocument {
    /// Validates the document once it has been parsed from model output.
    pub fn validate(&self) -> AppResult<()> {
        match self {
            EndpointDocument::Details(_) => Ok(()),
            EndpointDocument::Operation(op) => op.validate(),
        }
    }

    /// Renders the document as the Operation object placed under
    /// `paths[path][method]`.
    pub fn to_operation(&self, path: &str, method: crate::HttpMethod) -> AppResult<Value> {
        match self {
            EndpointDocument::Details(details) => Ok(
                crate::oas::generate::generate_operation(path, method, details),
            ),
            EndpointDocument::Operation(op) => {
                serde_json::to_value(op.clone().normalized()).map_err(AppError::from)
            }
        }
    }
}

/// Top-level `info` of a generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Document title.
    pub title: String,
    /// Document version.
    pub version: String,
}

impl DocumentInfo {
    /// Default title of a generated single-path document.
    pub const DEFAULT_TITLE: &'static str = "API Documentation";
    /// Default version of a generated single-path document.
    pub const DEFAULT_VERSION: &'static str = "1.0.0";

    /// Creates an info block.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
        }
    }

    /// Fills blank or missing values with the defaults.
    pub fn or_defaults(title: Option<&str>, version: Option<&str>) -> Self {
        fn pick(value: Option<&str>, default: &str) -> String {
            match value {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => default.to_string(),
            }
        }
        Self {
            title: pick(title, Self::DEFAULT_TITLE),
            version: pick(version, Self::DEFAULT_VERSION),
        }
    }
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self::or_defaults(None, None)
    }
}

/// An OpenAPI 3.0 document: path → lowercase method → Operation object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    /// OpenAPI version string.
    pub openapi: String,
    /// Title and version.
    pub info: DocumentInfo,
    /// Path items.
    pub paths: IndexMap<String, IndexMap<String, Value>>,
    /// Components object, present on aggregate documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Map<String, Value>>,
    /// Tag names.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl OpenApiDocument {
    /// OpenAPI version emitted by this crate.
    pub const VERSION: &'static str = "3.0.3";

    /// A document with no paths.
    pub fn empty(info: DocumentInfo) -> Self {
        Self {
            openapi: Self::VERSION.to_string(),
            info,
            paths: IndexMap::new(),
            components: None,
            tags: Vec::new(),
        }
    }
}
