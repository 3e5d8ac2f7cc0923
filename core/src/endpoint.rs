#![deny(missing_docs)]

//! # Endpoints
//!
//! Identity of a documented endpoint, its stored record, and the captured
//! request/response exchange that feeds the model.

use crate::error::{AppError, AppResult};
use crate::oas::EndpointDocument;
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// HTTP verbs accepted by the documentation proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Upper-case verb, as stored.
    pub fn as_upper(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Lower-case verb, as used for OpenAPI path-item keys.
    pub fn as_lower(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
        }
    }

    /// Only `post`, `put` and `patch` operations are documented with a request body.
    pub fn accepts_request_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }

    /// `GET` requests are forwarded without a body.
    pub fn carries_body(self) -> bool {
        self != HttpMethod::Get
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_upper())
    }
}

impl FromStr for HttpMethod {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(AppError::General(format!(
                "Unsupported HTTP method: {}",
                other
            ))),
        }
    }
}

/// A stored endpoint. At most one record exists per (`path`, `method`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointRecord {
    /// Generated identifier.
    pub id: Uuid,
    /// Path on the real backend (no query string).
    pub path: String,
    /// HTTP verb.
    pub method: HttpMethod,
    /// Latest generated document for this endpoint.
    pub document: EndpointDocument,
    /// First observation.
    pub created_at: NaiveDateTime,
    /// Last document replacement.
    pub updated_at: NaiveDateTime,
}

/// One forwarded exchange with the real backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Verb of the forwarded request.
    pub method: HttpMethod,
    /// Path of the target URL.
    pub path: String,
    /// Query parameters of the target URL.
    pub params: IndexMap<String, String>,
    /// JSON request body, absent for `GET` and empty bodies.
    pub body: Option<Value>,
    /// JSON response body.
    pub response: Value,
    /// Response status code.
    pub status: u16,
    /// Response headers.
    pub headers: IndexMap<String, String>,
}

impl Observation {
    /// The response with a paginated `data` array cut down to its first element.
    ///
    /// Keeps prompts bounded for list endpoints; any other response is returned as is.
    pub fn condensed_response(&self) -> Value {
        let mut response = self.response.clone();
        if let Some(Value::Array(items)) = response.get_mut("data") {
            items.truncate(1);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn observation(response: Value) -> Observation {
        Observation {
            method: HttpMethod::Get,
            path: "/users".into(),
            params: IndexMap::new(),
            body: None,
            response,
            status: 200,
            headers: IndexMap::new(),
        }
    }

    #[test]
    fn test_method_parsing_is_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("Patch".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert!("OPTIONS".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_method_casing() {
        assert_eq!(HttpMethod::Delete.as_upper(), "DELETE");
        assert_eq!(HttpMethod::Delete.as_lower(), "delete");
        assert_eq!(HttpMethod::Put.to_string(), "PUT");
    }

    #[test]
    fn test_request_body_policy() {
        assert!(HttpMethod::Post.accepts_request_body());
        assert!(HttpMethod::Put.accepts_request_body());
        assert!(HttpMethod::Patch.accepts_request_body());
        assert!(!HttpMethod::Get.accepts_request_body());
        assert!(!HttpMethod::Delete.accepts_request_body());
    }

    #[test]
    fn test_condensed_response_truncates_data_array() {
        let obs = observation(json!({
            "data": [{"id": 1}, {"id": 2}, {"id": 3}],
            "total": 3
        }));
        assert_eq!(
            obs.condensed_response(),
            json!({ "data": [{"id": 1}], "total": 3 })
        );
        // The captured response itself is untouched.
        assert_eq!(obs.response["data"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_condensed_response_leaves_other_shapes() {
        let obj = observation(json!({ "data": { "id": 1 } }));
        assert_eq!(obj.condensed_response(), json!({ "data": { "id": 1 } }));

        let list = observation(json!([1, 2, 3]));
        assert_eq!(list.condensed_response(), json!([1, 2, 3]));
    }
}
